// =============================================================================
// SPRITES — Id-keyed billboard table, painter's ordering and projection
// =============================================================================

use std::collections::HashMap;

use glam::Vec2;

use super::depth::DepthBuffer;
use super::framebuffer::{shade, Framebuffer};
use crate::camera::Camera;
use crate::geometry::{cell_of, distance_squared};
use crate::map::GridMap;
use crate::textures::{TextureHandle, TextureStore};

// ── Table ─────────────────────────────────────────────────────────────────────

/// Stable sprite identity. Issued from a monotonic counter, never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId(u64);

impl SpriteId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub texture: TextureHandle,
}

#[derive(Clone, Debug, Default)]
pub struct SpriteTable {
    sprites: HashMap<SpriteId, Sprite>,
    next_id: u64,
}

impl SpriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: Vec2, texture: TextureHandle) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.insert(id, Sprite { position, texture });
        id
    }

    /// Move sprite `id`. Unknown ids are ignored and return `false`.
    pub fn set_position(&mut self, id: SpriteId, position: Vec2) -> bool {
        match self.sprites.get_mut(&id) {
            Some(sprite) => {
                sprite.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        self.sprites.remove(&id)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites.iter().map(|(&id, s)| (id, s))
    }

    /// Sprites sorted farthest-first from `from`, ties broken by id.
    pub fn depth_order(&self, from: Vec2) -> Vec<SpriteInstance> {
        let mut out: Vec<SpriteInstance> = self
            .iter()
            .map(|(id, s)| SpriteInstance {
                id,
                position: s.position,
                texture: s.texture,
                distance_squared: distance_squared(from, s.position),
            })
            .collect();
        out.sort_by(|a, b| {
            b.distance_squared
                .total_cmp(&a.distance_squared)
                .then(a.id.cmp(&b.id))
        });
        out
    }
}

/// Per-frame view of a sprite with its ordering key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteInstance {
    pub id: SpriteId,
    pub position: Vec2,
    pub texture: TextureHandle,
    pub distance_squared: f32,
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Bound on projected screen coordinates and sizes, in pixels. Exact in f32
/// and far enough from `i32::MAX` that the footprint sums cannot overflow.
const FOOTPRINT_LIMIT: f32 = 16_777_216.0;

/// Screen footprint of a sprite, unclipped. `end_*` are exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Camera-space depth; always `> 0`.
    pub depth: f32,
    pub screen_x: i32,
    /// Side length of the square on screen.
    pub size: i32,
    pub start_x: i32,
    pub end_x: i32,
    pub start_y: i32,
    pub end_y: i32,
}

/// Project a world position onto a `width × height` view.
/// `None` when the point is on or behind the camera plane.
pub fn project_sprite(
    camera: &Camera,
    position: Vec2,
    width: u32,
    height: u32,
) -> Option<SpriteProjection> {
    let t = camera.to_camera_space(position);
    if t.y <= 0.0 {
        return None;
    }
    // Clamp before narrowing: depth can be arbitrarily close to zero.
    let screen_x = ((width / 2) as f32 * (1.0 + t.x / t.y)).clamp(-FOOTPRINT_LIMIT, FOOTPRINT_LIMIT) as i32;
    let size = (height as f32 / t.y).clamp(0.0, FOOTPRINT_LIMIT) as i32;
    let half_h = (height / 2) as i32;
    let start_x = screen_x - size / 2;
    let start_y = half_h - size / 2;

    Some(SpriteProjection {
        depth: t.y,
        screen_x,
        size,
        start_x,
        end_x: start_x + size,
        start_y,
        end_y: start_y + size,
    })
}

/// Sprite brightness. `lightmap` is `None` for sprites outside the grid.
pub fn sprite_shade(lightmap: Option<f32>, depth: f32, global_illumination: f32) -> f32 {
    let near = if depth > 0.0 { (1.0 / depth).min(1.0) } else { 1.0 };
    (lightmap.unwrap_or(0.0) * near + global_illumination).clamp(0.0, 1.0)
}

// ── Drawing ───────────────────────────────────────────────────────────────────

/// Draw every sprite back to front, column-tested against `depth`.
pub fn draw_sprites(
    fb: &mut Framebuffer,
    depth: &DepthBuffer,
    camera: &Camera,
    map: &GridMap,
    sprites: &SpriteTable,
    textures: &TextureStore,
    global_illumination: f32,
) {
    let (w, h) = (fb.width(), fb.height());

    for instance in sprites.depth_order(camera.position) {
        let Some(image) = textures.get(instance.texture) else {
            continue;
        };
        let Some(p) = project_sprite(camera, instance.position, w, h) else {
            continue;
        };
        if p.size <= 0 || image.width() == 0 || image.height() == 0 {
            continue;
        }

        let light = map.lightmap_at(cell_of(instance.position));
        let brightness = sprite_shade(light, p.depth, global_illumination);
        let (tex_w, tex_h) = (image.width() as i64, image.height() as i64);
        let size = p.size as i64;

        for x in p.start_x.max(0)..p.end_x.min(w as i32) {
            if depth.occludes(x as u32, p.depth) {
                continue;
            }
            let tex_x = ((x - p.start_x) as i64 * tex_w / size) as u32;
            for y in p.start_y.max(0)..p.end_y.min(h as i32) {
                let tex_y = ((y - p.start_y) as i64 * tex_h / size) as u32;
                let Some(&texel) = image.get_pixel_checked(tex_x, tex_y) else {
                    continue;
                };
                if texel.0[3] == 0 {
                    continue;
                }
                fb.set_pixel(x, y, shade(texel, brightness));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store = TextureStore::new();
        let tex = store.insert("t", image::RgbaImage::new(1, 1));
        let mut table = SpriteTable::new();
        let a = table.insert(Vec2::ZERO, tex);
        table.remove(a);
        let b = table.insert(Vec2::ZERO, tex);
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn sprite_shade_clamps_close_sprites() {
        assert_eq!(sprite_shade(Some(0.5), 0.25, 0.0), 0.5);
        assert!((sprite_shade(Some(0.5), 2.0, 0.1) - 0.35).abs() < 1e-6);
        assert_eq!(sprite_shade(None, 2.0, 0.1), 0.1);
    }

    #[test]
    fn projection_is_centred_for_a_point_ahead() {
        let cam = Camera::new(Vec2::new(1.5, 1.5), Vec2::X);
        let p = project_sprite(&cam, Vec2::new(3.5, 1.5), 320, 200).unwrap();
        assert_eq!(p.screen_x, 160);
        assert_eq!(p.size, 100);
        assert_eq!((p.start_y, p.end_y), (50, 150));
    }
}
