// =============================================================================
// WALLS — Per-column grid DDA and textured wall strips
// =============================================================================

use glam::{IVec2, Vec2};

use super::depth::DepthBuffer;
use super::framebuffer::{shade, Framebuffer};
use super::RenderSettings;
use crate::camera::Camera;
use crate::geometry::{GridWalker, Side};
use crate::map::{GridMap, LayerKind, EMPTY};
use crate::textures::TileAtlas;

/// Closest a hit may be; keeps the projected height finite when the camera
/// sits exactly on a grid line.
const MIN_DISTANCE: f32 = 1e-4;

/// Brightness factor of x-crossing faces.
pub const VERTICAL_TONE: f32 = 1.0;
/// Brightness factor of y-crossing faces.
pub const HORIZONTAL_TONE: f32 = 128.0 / 255.0;

/// Result of a single wall ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallHit {
    /// Wall cell that stopped the ray.
    pub cell: IVec2,
    /// Its wall tile id (never empty).
    pub tile: u32,
    pub side: Side,
    /// Perpendicular distance to the camera plane. Always `> 0`.
    pub distance: f32,
    /// Fractional position of the hit along the wall face, in `[0, 1)`.
    pub wall_x: f32,
    /// Texture column, already mirrored so textures read left to right.
    pub tex_x: u32,
}

/// Walk the grid from `origin` along `dir` until a wall is found.
///
/// Returns `None` when the ray leaves the grid or `step_budget` cells have
/// been visited without a hit.
pub fn cast_ray(
    map: &GridMap,
    origin: Vec2,
    dir: Vec2,
    step_budget: u32,
    tile_size: u32,
) -> Option<WallHit> {
    let mut walker = GridWalker::new(origin, dir);

    for _ in 0..step_budget {
        let (cell, side) = walker.advance();
        let tile = map.tile(LayerKind::Walls, cell)?;
        if tile == EMPTY {
            continue;
        }

        let distance = walker.perpendicular_distance().max(MIN_DISTANCE);
        let along = match side {
            Side::Vertical => origin.y + distance * dir.y,
            Side::Horizontal => origin.x + distance * dir.x,
        };
        let wall_x = along - along.floor();

        let mut tex_x = ((wall_x * tile_size as f32) as u32).min(tile_size.saturating_sub(1));
        let mirrored = match side {
            Side::Vertical => dir.x > 0.0,
            Side::Horizontal => dir.y < 0.0,
        };
        if mirrored {
            tex_x = tile_size - tex_x - 1;
        }

        return Some(WallHit { cell, tile, side, distance, wall_x, tex_x });
    }

    None
}

/// Wall brightness: light scaled by the face tone, plus GI, over distance.
pub fn wall_shade(lightmap: f32, side: Side, distance: f32, global_illumination: f32) -> f32 {
    let tone = match side {
        Side::Vertical => VERTICAL_TONE,
        Side::Horizontal => HORIZONTAL_TONE,
    };
    ((lightmap * tone + global_illumination) / distance.max(1.0)).clamp(0.0, 1.0)
}

/// Cast one ray per framebuffer column, draw the wall strips and refill the
/// depth buffer.
pub fn render_walls(
    fb: &mut Framebuffer,
    depth: &mut DepthBuffer,
    camera: &Camera,
    map: &GridMap,
    atlas: &TileAtlas,
    settings: &RenderSettings,
) {
    let (w, h) = (fb.width(), fb.height());
    let tile = atlas.tile_size();

    for x in 0..w {
        let dir = camera.ray_dir(Camera::column_offset(x, w));
        let Some(hit) = cast_ray(map, camera.position, dir, settings.step_budget, tile) else {
            depth.set(x, f32::INFINITY);
            continue;
        };
        depth.set(x, hit.distance);

        let line_h = h as f32 / hit.distance;
        let top = (h as f32 - line_h) / 2.0;
        let draw_start = top.max(0.0) as i32;
        let draw_end = (top + line_h).min(h as f32) as i32;

        let light = map.lightmap_at(hit.cell).unwrap_or(0.0);
        let brightness = wall_shade(light, hit.side, hit.distance, settings.global_illumination);

        for y in draw_start..draw_end {
            let tex_y = (((y as f32 - top) / line_h) * tile as f32) as u32;
            if let Some(texel) = atlas.texel(hit.tile, hit.tex_x, tex_y.min(tile - 1)) {
                fb.set_pixel(x as i32, y, shade(texel, brightness));
            }
        }
    }
}
