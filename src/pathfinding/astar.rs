use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use glam::IVec2;

use crate::map::GridMap;

// =============================================================================
// A* PATHFINDING
// =============================================================================

const NEIGHBOURS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X];

#[inline]
fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Shortest 4-connected path from `start` to `goal`.
///
/// Returns the full path including both endpoints, or `None` if no path
/// exists within `max_iterations` expanded nodes.
///
/// # Arguments
/// * `is_passable` - true if a cell can be walked on. The goal is always
///   accepted so that an occupied target can still be reached.
pub fn astar(
    start: IVec2,
    goal: IVec2,
    is_passable: impl Fn(IVec2) -> bool,
    max_iterations: usize,
) -> Option<Vec<IVec2>> {
    if start == goal {
        return Some(vec![start]);
    }

    // (f, x, y) as a min-heap; coordinates break ties deterministically.
    let mut open: BinaryHeap<Reverse<(i32, i32, i32)>> = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, i32> = HashMap::new();

    g_score.insert(start, 0);
    open.push(Reverse((manhattan(start, goal), start.x, start.y)));

    let mut iterations = 0;

    while let Some(Reverse((_, cx, cy))) = open.pop() {
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }

        let current = IVec2::new(cx, cy);
        if current == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        let current_g = g_score.get(&current).copied().unwrap_or(i32::MAX);

        for offset in NEIGHBOURS {
            let next = current + offset;
            if next != goal && !is_passable(next) {
                continue;
            }

            let new_g = current_g.saturating_add(1);
            let existing_g = g_score.get(&next).copied().unwrap_or(i32::MAX);
            if new_g < existing_g {
                g_score.insert(next, new_g);
                came_from.insert(next, current);
                open.push(Reverse((new_g + manhattan(next, goal), next.x, next.y)));
            }
        }
    }

    None
}

/// [`astar`] over the open cells of `map`.
pub fn astar_on_map(map: &GridMap, start: IVec2, goal: IVec2, max_iterations: usize) -> Option<Vec<IVec2>> {
    if !map.contains(goal) {
        return None;
    }
    astar(start, goal, |c| !map.is_blocked_at(c.x, c.y), max_iterations)
}

fn reconstruct_path(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        current = *came_from.get(&current)?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}

/// First step along the path, or `None` if already there or unreachable.
pub fn astar_next_step(
    start: IVec2,
    goal: IVec2,
    is_passable: impl Fn(IVec2) -> bool,
    max_iterations: usize,
) -> Option<IVec2> {
    let path = astar(start, goal, is_passable, max_iterations)?;
    path.get(1).copied()
}
