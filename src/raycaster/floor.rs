// =============================================================================
// FLOOR — Row-by-row inverse perspective mapping for floor and ceiling
//
// Every row below the horizon corresponds to one distance from the camera.
// The ceiling is the same row mirrored across the horizon.
// =============================================================================

use super::framebuffer::{shade, Framebuffer};
use crate::camera::Camera;
use crate::geometry::cell_of;
use crate::map::{GridMap, LayerKind, EMPTY};
use crate::textures::TileAtlas;

/// Camera distance of screen row `y` of a `height`-row view.
/// `None` on and above the horizon.
pub fn row_distance(y: u32, height: u32) -> Option<f32> {
    let half = height / 2;
    if y <= half {
        return None;
    }
    Some(half as f32 / (y - half) as f32)
}

/// Floor/ceiling brightness at `row_distance`.
pub fn floor_shade(lightmap: f32, row_distance: f32, global_illumination: f32) -> f32 {
    (lightmap / row_distance.max(1.0) + global_illumination).clamp(0.0, 1.0)
}

pub fn render_floor_and_ceiling(
    fb: &mut Framebuffer,
    camera: &Camera,
    map: &GridMap,
    atlas: &TileAtlas,
    global_illumination: f32,
) {
    let (w, h) = (fb.width(), fb.height());
    if w == 0 {
        return;
    }
    let tile = atlas.tile_size();
    let mask = tile as i32 - 1;
    let ray0 = camera.direction - camera.plane;
    let ray1 = camera.direction + camera.plane;
    let floors = map.layer(LayerKind::Floor);
    let ceilings = map.layer(LayerKind::Ceiling);

    for y in (h / 2 + 1)..h {
        let Some(distance) = row_distance(y, h) else {
            continue;
        };
        let step = distance * (ray1 - ray0) / w as f32;
        let mut pos = camera.position + distance * ray0;
        let ceiling_y = (h - y) as i32;

        for x in 0..w as i32 {
            let cell = cell_of(pos);
            let frac = pos - cell.as_vec2();
            let tx = ((tile as f32 * frac.x) as i32 & mask) as u32;
            let ty = ((tile as f32 * frac.y) as i32 & mask) as u32;
            pos += step;

            let Some(i) = map.index(cell.x, cell.y) else {
                continue;
            };
            let brightness = floor_shade(map.lightmap()[i], distance, global_illumination);

            if floors[i] != EMPTY {
                if let Some(texel) = atlas.texel(floors[i], tx, ty) {
                    fb.set_pixel(x, y as i32, shade(texel, brightness));
                }
            }
            if ceilings[i] != EMPTY {
                if let Some(texel) = atlas.texel(ceilings[i], tx, ty) {
                    fb.set_pixel(x, ceiling_y, shade(texel, brightness));
                }
            }
        }
    }
}
