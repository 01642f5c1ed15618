use gridcaster::map::*;
use gridcaster::{ErrorKind, EngineError, MAX_LIGHT};

fn open_grid(w: u32, h: u32) -> GridMap {
    GridMap::new(w, h, 0)
}

fn light_at(map: &GridMap, x: i32, y: i32) -> i32 {
    map.get_light_at(map.index(x, y).unwrap()).unwrap()
}

#[test]
fn auto_light_map_darkens_only_covered_open_cells() {
    let mut map = GridMap::new(3, 1, 48);
    map.set_layer(LayerKind::Ceiling, vec![1, 1, 0]).unwrap();
    map.set_layer(LayerKind::Walls, vec![0, 1, 0]).unwrap();
    map.auto_light_map();

    assert_eq!(map.light(), &[16, 48, 48]);
    assert!((map.lightmap()[0] - 16.0 / 128.0).abs() < 1e-6);
}

#[test]
fn point_light_falls_off_with_grid_steps() {
    let mut map = open_grid(5, 5);
    map.set_light(12, MAX_LIGHT).unwrap();

    assert_eq!(light_at(&map, 2, 2), 128);
    for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
        assert_eq!(light_at(&map, x, y), 25, "neighbour ({x}, {y})");
    }
    assert_eq!(light_at(&map, 0, 2), 5);
    assert_eq!(light_at(&map, 4, 2), 5);
    assert_eq!(light_at(&map, 2, 0), 5);
    for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert_eq!(light_at(&map, x, y), 0, "corner ({x}, {y})");
    }
}

#[test]
fn light_is_symmetric_about_the_source() {
    let mut map = open_grid(7, 7);
    map.set_light(map.index(3, 3).unwrap(), MAX_LIGHT).unwrap();

    assert_eq!(light_at(&map, 2, 3), light_at(&map, 4, 3));
    assert_eq!(light_at(&map, 3, 2), light_at(&map, 3, 4));
    assert_eq!(light_at(&map, 1, 3), light_at(&map, 5, 3));
}

#[test]
fn lightmap_tracks_light_after_propagation() {
    let mut map = open_grid(5, 5);
    map.set_light(12, MAX_LIGHT).unwrap();
    for (l, m) in map.light().iter().zip(map.lightmap()) {
        assert!((*l as f32 / MAX_LIGHT as f32 - m).abs() < 1e-6);
    }
}

#[test]
fn wall_catches_half_and_shadows_behind() {
    let mut map = open_grid(5, 5);
    let mut walls = vec![0; 25];
    walls[map.index(3, 2).unwrap()] = 1;
    map.set_layer(LayerKind::Walls, walls).unwrap();

    map.set_light(12, MAX_LIGHT).unwrap();

    assert_eq!(light_at(&map, 3, 2), 12);
    assert_eq!(light_at(&map, 4, 2), 0);
    assert_eq!(light_at(&map, 1, 2), 25);
}

#[test]
fn light_never_rises_above_ambient_past_the_falloff() {
    let mut map = GridMap::new(9, 9, 40);
    map.set_light(map.index(4, 4).unwrap(), 60).unwrap();
    // lerp(40, 60, 0.2) = 44 next to the source, then ambient.
    assert_eq!(light_at(&map, 5, 4), 44);
    assert_eq!(light_at(&map, 7, 4), 40);
}

#[test]
fn out_of_range_set_light_leaves_map_untouched() {
    let mut map = open_grid(5, 5);
    map.set_light(12, MAX_LIGHT).unwrap();
    let before = map.light().to_vec();

    let err = map.set_light(25, MAX_LIGHT).unwrap_err();
    assert!(matches!(err, EngineError::LightIndexOutOfRange { index: 25, len: 25 }));
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(map.light(), before.as_slice());
}

#[test]
fn get_light_at_reports_range_errors() {
    let map = GridMap::new(2, 2, 10);
    assert_eq!(map.get_light_at(3).unwrap(), 10);
    assert!(map.get_light_at(4).is_err());
}

#[test]
fn saturating_overlap_stops_at_max_light() {
    let mut map = open_grid(5, 5).with_accumulation(LightAccumulation::Saturating);
    map.set_light(12, MAX_LIGHT).unwrap();
    map.set_light(map.index(4, 2).unwrap(), MAX_LIGHT).unwrap();

    assert_eq!(light_at(&map, 2, 2), MAX_LIGHT);
    assert!(map.light().iter().all(|&l| l <= MAX_LIGHT));
}

#[test]
fn additive_overlap_can_exceed_max_light() {
    let mut map = open_grid(5, 5).with_accumulation(LightAccumulation::Additive);
    map.set_light(12, MAX_LIGHT).unwrap();
    map.set_light(map.index(4, 2).unwrap(), MAX_LIGHT).unwrap();

    assert!(light_at(&map, 2, 2) > MAX_LIGHT);
}

#[test]
fn propagate_outside_grid_is_a_no_op() {
    let mut map = open_grid(3, 3);
    map.propagate_light(-1, 5, 1.0);
    assert!(map.light().iter().all(|&l| l == 0));
}

#[test]
fn resetting_a_light_replaces_its_previous_spread() {
    let mut map = GridMap::new(15, 1, 48);
    map.set_light(7, MAX_LIGHT).unwrap();
    assert_eq!(light_at(&map, 8, 0), 64);
    assert_eq!(light_at(&map, 9, 0), 51);

    map.set_light(7, 60).unwrap();
    assert_eq!(light_at(&map, 7, 0), 60);
    // lerp(48, 60, 0.2) = 50.4; one cell further is back to ambient.
    assert_eq!(light_at(&map, 8, 0), 50);
    assert_eq!(light_at(&map, 9, 0), 48);
    assert_eq!(map.light_sources(), &[(7, 60)]);
}

#[test]
fn other_lights_survive_a_reset() {
    let mut map = open_grid(9, 1);
    map.set_light(1, MAX_LIGHT).unwrap();
    map.set_light(7, MAX_LIGHT).unwrap();
    map.set_light(7, 0).unwrap();

    assert_eq!(light_at(&map, 1, 0), MAX_LIGHT);
    assert_eq!(light_at(&map, 2, 0), 25);
    assert_eq!(light_at(&map, 6, 0), 0);
}

#[test]
fn baked_light_stays_under_point_lights() {
    let mut map = GridMap::new(9, 1, 0);
    map.propagate_light(1, 0, 1.0);
    let baked = light_at(&map, 2, 0);
    assert_eq!(baked, 25);

    map.set_light(7, 60).unwrap();
    map.set_light(7, 10).unwrap();
    assert_eq!(light_at(&map, 2, 0), baked);
    assert!(map.light_sources().iter().all(|&(i, _)| i == 7));
}
