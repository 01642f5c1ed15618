// =============================================================================
// RAYCASTER — Software renderer: backdrop, floor/ceiling, walls, sprites
//
// Draw order per frame:
//   1. Backdrop        (stretched `background` texture, or a clear)
//   2. Floor/ceiling   (row casting)
//   3. Walls           (column casting, fills the depth buffer)
//   4. Sprites         (back to front, depth-tested per column)
// =============================================================================

pub mod depth;
pub mod floor;
pub mod framebuffer;
pub mod sprites;
pub mod walls;

pub use depth::DepthBuffer;
pub use floor::{floor_shade, row_distance};
pub use framebuffer::{shade, Framebuffer};
pub use sprites::{
    project_sprite, sprite_shade, Sprite, SpriteId, SpriteInstance, SpriteProjection, SpriteTable,
};
pub use walls::{cast_ray, wall_shade, WallHit};

use image::Rgba;

use crate::camera::Camera;
use crate::map::GridMap;
use crate::runtime::FrameSnapshot;
use crate::textures::{TextureHandle, TextureStore, TileAtlas};
use crate::{DEFAULT_GLOBAL_ILLUMINATION, DEFAULT_STEP_BUDGET};

/// Name of the texture stretched behind everything else.
pub const BACKDROP_TEXTURE: &str = "background";

const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Per-renderer tuning knobs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Maximum cells a wall ray visits before giving up.
    pub step_budget: u32,
    /// Constant light added to every surface.
    pub global_illumination: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
            global_illumination: DEFAULT_GLOBAL_ILLUMINATION,
        }
    }
}

/// Owns the render targets and the textures the passes sample from.
///
/// Only ever touched by the render thread; the simulation state it draws
/// arrives as a [`FrameSnapshot`].
pub struct Raycaster {
    framebuffer: Framebuffer,
    depth: DepthBuffer,
    atlas: TileAtlas,
    textures: TextureStore,
    backdrop: Option<TextureHandle>,
    settings: RenderSettings,
}

impl Raycaster {
    pub fn new(
        width: u32,
        height: u32,
        atlas: TileAtlas,
        textures: TextureStore,
        settings: RenderSettings,
    ) -> Self {
        let backdrop = textures.handle(BACKDROP_TEXTURE);
        Self {
            framebuffer: Framebuffer::new(width, height),
            depth: DepthBuffer::new(width),
            atlas,
            textures,
            backdrop,
            settings,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Choose the backdrop texture, or `None` to clear to black.
    pub fn set_backdrop(&mut self, handle: Option<TextureHandle>) {
        self.backdrop = handle;
    }

    // ── Passes ──────────────────────────────────────────────────────────────

    /// Stretch the backdrop over the whole framebuffer (nearest sampling).
    pub fn render_backdrop(&mut self) {
        let image = self.backdrop.and_then(|h| self.textures.get(h));
        let Some(image) = image.filter(|i| i.width() > 0 && i.height() > 0) else {
            self.framebuffer.clear(CLEAR_COLOR);
            return;
        };
        let (w, h) = (self.framebuffer.width(), self.framebuffer.height());
        for y in 0..h {
            let sy = (y as u64 * image.height() as u64 / h as u64) as u32;
            for x in 0..w {
                let sx = (x as u64 * image.width() as u64 / w as u64) as u32;
                self.framebuffer.set_pixel(x as i32, y as i32, *image.get_pixel(sx, sy));
            }
        }
    }

    pub fn render_floor_and_ceiling(&mut self, camera: &Camera, map: &GridMap) {
        floor::render_floor_and_ceiling(
            &mut self.framebuffer,
            camera,
            map,
            &self.atlas,
            self.settings.global_illumination,
        );
    }

    pub fn render_walls(&mut self, camera: &Camera, map: &GridMap) {
        walls::render_walls(
            &mut self.framebuffer,
            &mut self.depth,
            camera,
            map,
            &self.atlas,
            &self.settings,
        );
    }

    /// Must run after [`Raycaster::render_walls`] for the same camera.
    pub fn draw_sprites(&mut self, camera: &Camera, map: &GridMap, sprites: &SpriteTable) {
        sprites::draw_sprites(
            &mut self.framebuffer,
            &self.depth,
            camera,
            map,
            sprites,
            &self.textures,
            self.settings.global_illumination,
        );
    }

    /// All passes in order for one snapshot.
    pub fn render_frame(&mut self, snapshot: &FrameSnapshot) -> &Framebuffer {
        self.render_backdrop();
        self.render_floor_and_ceiling(&snapshot.camera, &snapshot.map);
        self.render_walls(&snapshot.camera, &snapshot.map);
        self.draw_sprites(&snapshot.camera, &snapshot.map, &snapshot.sprites);
        &self.framebuffer
    }
}
