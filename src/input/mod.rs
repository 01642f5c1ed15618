// =============================================================================
// INPUT — Key bindings on the window thread, held actions on the simulation
//
// The window thread tracks raw keys in `InputState`, resolves them through an
// `ActionMap` and forwards `InputEvent`s over a channel. The simulation keeps
// the set of held actions in `ActionState`.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Represents a raw input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// What the player can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
    Run,
}

/// Message from the window thread to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

// ── InputState ────────────────────────────────────────────────────────────────

/// Raw hardware state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down. Returns `true` on the initial press only,
    /// not on OS key repeat.
    pub fn press_key(&mut self, key: KeyCode) -> bool {
        let fresh = self.keys_held.insert(key);
        if fresh {
            self.keys_pressed.insert(key);
        }
        fresh
    }

    /// Record a key going up. Returns `false` if it was not held.
    pub fn release_key(&mut self, key: KeyCode) -> bool {
        let was_held = self.keys_held.remove(&key);
        if was_held {
            self.keys_released.insert(key);
        }
        was_held
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.mouse_released.contains(&button) }
}

// ── ActionMap ─────────────────────────────────────────────────────────────────

/// Maps logical actions to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_default().push(source);
    }

    /// Every action bound to `source`.
    pub fn actions_for(&self, source: InputSource) -> impl Iterator<Item = A> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, sources)| sources.contains(&source))
            .map(|(&action, _)| action)
    }

    /// Returns true if the action was triggered this frame (pressed).
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).is_some_and(|sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => input.is_key_pressed(*k),
                InputSource::Mouse(b) => input.is_mouse_pressed(*b),
            })
        })
    }

    /// Returns true if the action is currently being held.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).is_some_and(|sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => input.is_key_held(*k),
                InputSource::Mouse(b) => input.is_mouse_held(*b),
            })
        })
    }

    /// Returns true if any bound source was released this frame.
    pub fn is_released(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).is_some_and(|sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => input.is_key_released(*k),
                InputSource::Mouse(b) => input.is_mouse_released(*b),
            })
        })
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

impl ActionMap<Action> {
    /// Arrow keys and WASD to move and turn, Shift to run.
    pub fn default_bindings() -> Self {
        let mut map = Self::new();
        for (action, keys) in [
            (Action::TurnLeft, [KeyCode::ArrowLeft, KeyCode::KeyA]),
            (Action::TurnRight, [KeyCode::ArrowRight, KeyCode::KeyD]),
            (Action::Forward, [KeyCode::ArrowUp, KeyCode::KeyW]),
            (Action::Backward, [KeyCode::ArrowDown, KeyCode::KeyS]),
            (Action::Run, [KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        ] {
            for key in keys {
                map.bind(action, InputSource::Key(key));
            }
        }
        map
    }
}

// ── ActionState ───────────────────────────────────────────────────────────────

/// Held actions as seen by the simulation.
#[derive(Debug, Default, Clone)]
pub struct ActionState {
    held: HashSet<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(a) => {
                self.held.insert(a);
            }
            InputEvent::Released(a) => {
                self.held.remove(&a);
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
