use glam::IVec2;
use gridcaster::map::{GridMap, LayerKind};
use gridcaster::pathfinding::{astar, astar_next_step, astar_on_map};

fn bounded(w: i32, h: i32) -> impl Fn(IVec2) -> bool {
    move |c: IVec2| c.x >= 0 && c.y >= 0 && c.x < w && c.y < h
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[test]
fn astar_trivial_same_start_and_goal() {
    let p = IVec2::new(2, 2);
    assert_eq!(astar(p, p, bounded(5, 5), 100), Some(vec![p]));
}

#[test]
fn astar_straight_line() {
    let path = astar(IVec2::ZERO, IVec2::new(4, 0), bounded(10, 10), 200).unwrap();
    assert_eq!(path.first(), Some(&IVec2::ZERO));
    assert_eq!(path.last(), Some(&IVec2::new(4, 0)));
    assert_eq!(path.len(), 5);
}

#[test]
fn astar_blocked_returns_none() {
    // Wall across x = 2 inside a bounded 10×5 area.
    let inside = bounded(10, 5);
    let result = astar(IVec2::ZERO, IVec2::new(4, 0), |c| inside(c) && c.x != 2, 500);
    assert!(result.is_none());
}

#[test]
fn astar_navigates_around_wall() {
    let inside = bounded(5, 5);
    let wall = IVec2::new(2, 2);
    let path = astar(IVec2::new(0, 2), IVec2::new(4, 2), |c| inside(c) && c != wall, 200).unwrap();
    assert_eq!(path.first(), Some(&IVec2::new(0, 2)));
    assert_eq!(path.last(), Some(&IVec2::new(4, 2)));
    assert!(!path.contains(&wall));
    assert_eq!(path.len(), 7);
}

#[test]
fn astar_path_is_four_connected() {
    let path = astar(IVec2::ZERO, IVec2::new(3, 4), bounded(8, 8), 500).unwrap();
    for pair in path.windows(2) {
        let d = (pair[1] - pair[0]).abs();
        assert_eq!(d.x + d.y, 1);
    }
}

#[test]
fn astar_max_iterations_limit() {
    let result = astar(IVec2::ZERO, IVec2::new(99, 99), bounded(100, 100), 1);
    assert!(result.is_none());
}

#[test]
fn astar_next_step_moves_toward_goal() {
    let next = astar_next_step(IVec2::ZERO, IVec2::new(0, 3), bounded(5, 5), 100);
    assert_eq!(next, Some(IVec2::new(0, 1)));
    assert_eq!(astar_next_step(IVec2::ONE, IVec2::ONE, bounded(5, 5), 100), None);
}

// ── On a GridMap ──────────────────────────────────────────────────────────────

#[test]
fn astar_on_map_avoids_wall_cells() {
    // 3×3 with the middle column walled except the bottom row.
    let mut map = GridMap::new(3, 3, 0);
    map.set_layer(LayerKind::Walls, vec![0, 1, 0, 0, 1, 0, 0, 0, 0]).unwrap();
    let path = astar_on_map(&map, IVec2::new(0, 0), IVec2::new(2, 0), 100).unwrap();
    assert!(path.iter().all(|c| !map.is_blocked_at(c.x, c.y)));
    assert!(path.contains(&IVec2::new(1, 2)));
}

#[test]
fn astar_on_map_rejects_goal_outside_grid() {
    let map = GridMap::new(3, 3, 0);
    assert!(astar_on_map(&map, IVec2::ZERO, IVec2::new(5, 0), 100).is_none());
}
