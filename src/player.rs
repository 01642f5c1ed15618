// =============================================================================
// PLAYER — Turning and walking the camera through the grid
// =============================================================================

use glam::Vec2;

use crate::camera::Camera;
use crate::geometry::cell_of;
use crate::input::{Action, ActionState};
use crate::map::GridMap;

/// Distance ahead of the player checked for walls before a step.
pub const LOOK_AHEAD: f32 = 0.6;

/// Speeds in radians / cells per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovementSettings {
    pub rotation_speed: f32,
    pub movement_speed: f32,
    pub run_speed: f32,
    pub look_ahead: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 2.0,
            movement_speed: 2.0,
            run_speed: 5.66,
            look_ahead: LOOK_AHEAD,
        }
    }
}

/// Step along `direction` (negative `amount` walks backwards) unless the cell
/// `look_ahead` cells away in that direction is blocked.
/// Returns whether the camera moved.
pub fn step(camera: &mut Camera, map: &GridMap, amount: f32, look_ahead: f32) -> bool {
    let facing = camera.direction * amount.signum();
    let ahead = cell_of(camera.position + facing * look_ahead);
    if map.is_blocked_at(ahead.x, ahead.y) {
        return false;
    }
    camera.position += camera.direction * amount;
    true
}

/// Apply one tick of held actions to the camera.
pub fn apply_actions(
    camera: &mut Camera,
    actions: &ActionState,
    map: &GridMap,
    settings: &MovementSettings,
    dt: f32,
) {
    let turn = match (actions.is_held(Action::TurnLeft), actions.is_held(Action::TurnRight)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    if turn != 0.0 {
        camera.rotate(turn * settings.rotation_speed * dt);
    }

    let speed = if actions.is_held(Action::Run) {
        settings.run_speed
    } else {
        settings.movement_speed
    };
    let walk = match (actions.is_held(Action::Forward), actions.is_held(Action::Backward)) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    };
    if walk != 0.0 {
        step(camera, map, walk * speed * dt, settings.look_ahead);
    }
}

/// Centre of the cell containing `position`.
pub fn cell_centre(position: Vec2) -> Vec2 {
    cell_of(position).as_vec2() + Vec2::splat(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::map::LayerKind;

    fn corridor() -> GridMap {
        // 4×1 strip with a wall at x = 3.
        let mut map = GridMap::new(4, 1, 0);
        map.set_layer(LayerKind::Walls, vec![0, 0, 0, 1]).unwrap();
        map
    }

    #[test]
    fn walls_stop_the_step_before_contact() {
        let map = corridor();
        let mut cam = Camera::new(Vec2::new(2.5, 0.5), Vec2::X);
        assert!(!step(&mut cam, &map, 0.1, LOOK_AHEAD));
        assert_eq!(cam.position, Vec2::new(2.5, 0.5));
    }

    #[test]
    fn backwards_checks_behind() {
        let map = corridor();
        let mut cam = Camera::new(Vec2::new(1.5, 0.5), Vec2::X);
        assert!(step(&mut cam, &map, -0.5, LOOK_AHEAD));
        assert!((cam.position.x - 1.0).abs() < 1e-6);
        // Grid edge behind counts as blocked.
        assert!(!step(&mut cam, &map, -0.5, LOOK_AHEAD * 2.0));
    }

    #[test]
    fn run_uses_run_speed() {
        let map = corridor();
        let mut cam = Camera::new(Vec2::new(0.5, 0.5), Vec2::X);
        let mut actions = ActionState::new();
        actions.apply(InputEvent::Pressed(Action::Forward));
        actions.apply(InputEvent::Pressed(Action::Run));
        let settings = MovementSettings::default();
        apply_actions(&mut cam, &actions, &map, &settings, 0.1);
        assert!((cam.position.x - (0.5 + 0.566)).abs() < 1e-5);
    }

    #[test]
    fn opposite_turns_cancel() {
        let map = corridor();
        let mut cam = Camera::new(Vec2::new(0.5, 0.5), Vec2::X);
        let mut actions = ActionState::new();
        actions.apply(InputEvent::Pressed(Action::TurnLeft));
        actions.apply(InputEvent::Pressed(Action::TurnRight));
        apply_actions(&mut cam, &actions, &map, &MovementSettings::default(), 0.5);
        assert_eq!(cam.direction, Vec2::X);
    }
}
