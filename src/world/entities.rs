use glam::{IVec2, Vec2};
use log::debug;
use rand::Rng;

use crate::geometry::{cell_of, lerp};
use crate::map::GridMap;
use crate::pathfinding::astar_on_map;
use crate::raycaster::SpriteId;

/// Seconds between forced re-plans toward the player.
pub const REPLAN_INTERVAL: f32 = 10.0;
/// Seconds before the first re-plan after spawning.
const FIRST_REPLAN: f32 = 5.0;
/// Distance at which a waypoint counts as reached.
const WAYPOINT_RADIUS: f32 = 0.1;
const MAX_SEARCH: usize = 4096;
const RESPAWN_ATTEMPTS: usize = 64;

/// A sprite that walks an A* path toward the player and re-plans
/// periodically. When no path exists it reappears at a random open cell.
#[derive(Clone, Debug)]
pub struct Stalker {
    pub sprite: SpriteId,
    pub position: Vec2,
    /// Interpolation factor per second toward the current waypoint.
    pub speed: f32,
    path: Vec<IVec2>,
    path_index: usize,
    replan_timer: f32,
}

impl Stalker {
    pub fn new(sprite: SpriteId, position: Vec2) -> Self {
        Self {
            sprite,
            position,
            speed: 1.0,
            path: Vec::new(),
            path_index: 0,
            replan_timer: FIRST_REPLAN,
        }
    }

    pub fn path(&self) -> &[IVec2] {
        &self.path
    }

    fn waypoint(&self) -> Option<Vec2> {
        self.path
            .get(self.path_index)
            .map(|c| c.as_vec2() + Vec2::splat(0.5))
    }

    fn plan(&mut self, map: &GridMap, player: Vec2, rng: &mut impl Rng) {
        let found = astar_on_map(map, cell_of(self.position), cell_of(player), MAX_SEARCH);
        match found {
            Some(path) if path.len() > 1 => {
                self.path = path;
                self.path_index = 0;
            }
            _ => {
                self.path.clear();
                self.respawn(map, rng);
            }
        }
    }

    fn respawn(&mut self, map: &GridMap, rng: &mut impl Rng) {
        if map.is_empty() {
            return;
        }
        for _ in 0..RESPAWN_ATTEMPTS {
            let index = rng.gen_range(0..map.len());
            if !map.is_blocked(index) {
                self.position = map.coords(index).as_vec2() + Vec2::splat(0.5);
                debug!("stalker {:?} respawned at {}", self.sprite, self.position);
                return;
            }
        }
    }

    /// Advance one tick and return the new position.
    pub fn update(&mut self, dt: f32, map: &GridMap, player: Vec2, rng: &mut impl Rng) -> Vec2 {
        self.replan_timer -= dt;
        if self.replan_timer <= 0.0 {
            self.path.clear();
            self.replan_timer = REPLAN_INTERVAL;
        }
        if self.path_index >= self.path.len() {
            self.plan(map, player, rng);
        }

        let Some(target) = self.waypoint() else {
            return self.position;
        };
        let f = (dt * self.speed).clamp(0.0, 1.0);
        self.position = Vec2::new(
            lerp(self.position.x, target.x, f),
            lerp(self.position.y, target.y, f),
        );
        let d = (self.position - target).abs();
        if d.x < WAYPOINT_RADIUS && d.y < WAYPOINT_RADIUS {
            self.path_index += 1;
        }
        self.position
    }
}
