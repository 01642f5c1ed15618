use glam::{IVec2, Vec2};
use image::{Rgba, RgbaImage};

use gridcaster::camera::Camera;
use gridcaster::geometry::Side;
use gridcaster::map::{GridMap, LayerKind};
use gridcaster::raycaster::*;
use gridcaster::textures::{TextureStore, TileAtlas};
use gridcaster::MAX_LIGHT;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// `w × h` grid whose outer ring is wall tile 1.
fn bordered(w: u32, h: u32, base_light: i32) -> GridMap {
    let mut map = GridMap::new(w, h, base_light);
    let walls = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| u32::from(x == 0 || y == 0 || x == w - 1 || y == h - 1))
        .collect();
    map.set_layer(LayerKind::Walls, walls).unwrap();
    map
}

/// Two 32px tiles: tile 0 grey, tile 1 red.
fn atlas() -> TileAtlas {
    let image = RgbaImage::from_fn(64, 32, |x, _| if x >= 32 { RED } else { Rgba([90, 90, 90, 255]) });
    TileAtlas::new(image, 32).unwrap()
}

#[test]
fn ray_from_room_centre_hits_the_east_wall() {
    let map = bordered(3, 3, 0);
    let hit = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::X, 100, 32).unwrap();

    assert_eq!(hit.cell, IVec2::new(2, 1));
    assert_eq!(hit.tile, 1);
    assert_eq!(hit.side, Side::Vertical);
    assert!((hit.distance - 0.5).abs() < 1e-5);
}

#[test]
fn distance_is_perpendicular_to_the_camera_plane() {
    let map = bordered(5, 3, 0);
    let hit = cast_ray(&map, Vec2::new(1.25, 1.5), Vec2::X, 100, 32).unwrap();
    assert_eq!(hit.cell, IVec2::new(4, 1));
    assert!((hit.distance - 2.75).abs() < 1e-5);

    // A slanted ray hitting the same face reports the same plane distance.
    let camera = Camera::new(Vec2::new(1.25, 1.5), Vec2::X);
    let slanted = cast_ray(&map, camera.position, camera.ray_dir(0.1), 100, 32).unwrap();
    assert_eq!(slanted.side, Side::Vertical);
    assert!((slanted.distance - 2.75).abs() < 1e-4);
}

#[test]
fn stepping_along_y_reports_a_horizontal_side() {
    let map = bordered(3, 3, 0);
    let hit = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::Y, 100, 32).unwrap();
    assert_eq!(hit.cell, IVec2::new(1, 2));
    assert_eq!(hit.side, Side::Horizontal);
    assert_eq!(hit.tex_x, 16);
}

#[test]
fn texture_columns_mirror_on_far_faces() {
    let map = bordered(3, 3, 0);
    let east = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::X, 100, 32).unwrap();
    let west = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::NEG_X, 100, 32).unwrap();
    let north = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::NEG_Y, 100, 32).unwrap();

    assert_eq!(west.tex_x, 16);
    assert_eq!(east.tex_x, 15);
    assert_eq!(north.tex_x, 15);
    assert!((east.wall_x - 0.5).abs() < 1e-5);
}

#[test]
fn ray_leaving_the_grid_is_a_miss() {
    let map = GridMap::new(4, 4, 0);
    assert!(cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::new(0.3, 0.7), 100, 32).is_none());
}

#[test]
fn exhausted_step_budget_is_a_miss() {
    let map = bordered(40, 3, 0);
    assert!(cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::X, 5, 32).is_none());
    assert!(cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::X, 100, 32).is_some());
}

#[test]
fn hits_on_a_grid_line_keep_a_positive_distance() {
    let map = bordered(3, 3, 0);
    let hit = cast_ray(&map, Vec2::new(1.0, 1.5), Vec2::NEG_X, 100, 32).unwrap();
    assert_eq!(hit.cell, IVec2::new(0, 1));
    assert!(hit.distance > 0.0);
}

#[test]
fn horizontal_faces_are_darker() {
    let v = wall_shade(1.0, Side::Vertical, 1.0, 0.0);
    let h = wall_shade(1.0, Side::Horizontal, 1.0, 0.0);
    assert!(h < v);
    assert!((h - 128.0 / 255.0).abs() < 1e-6);
    assert!(wall_shade(1.0, Side::Vertical, 4.0, 0.0) < v);
}

#[test]
fn render_walls_fills_every_depth_column() {
    let map = bordered(3, 3, MAX_LIGHT);
    let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::X);
    let mut rc = Raycaster::new(320, 200, atlas(), TextureStore::new(), RenderSettings::default());

    rc.render_walls(&camera, &map);

    let depth = rc.depth_buffer();
    assert_eq!(depth.len(), 320);
    assert!(depth.as_slice().iter().all(|d| d.is_finite() && *d > 0.0));
    assert!((depth.get(160) - 0.5).abs() < 1e-5);

    // Fully lit face seen head-on: the texel comes through unshaded.
    assert_eq!(rc.framebuffer().pixel(160, 100), Some(RED));
}

#[test]
fn columns_without_a_wall_stay_infinitely_deep() {
    let map = GridMap::new(4, 4, 0);
    let camera = Camera::new(Vec2::new(1.5, 1.5), Vec2::X);
    let mut rc = Raycaster::new(64, 40, atlas(), TextureStore::new(), RenderSettings::default());
    rc.render_walls(&camera, &map);
    assert!(rc.depth_buffer().as_slice().iter().all(|d| d.is_infinite()));
}
