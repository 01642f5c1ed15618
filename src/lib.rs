pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod input;
pub mod level;
pub mod map;
pub mod pathfinding;
pub mod player;
pub mod raycaster;
pub mod runtime;
pub mod textures;
pub mod window;
pub mod world;

pub use error::{EngineError, ErrorKind, Result};

/// Internal framebuffer resolution.
pub const DISPLAY_WIDTH: u32 = 320;
pub const DISPLAY_HEIGHT: u32 = 200;

/// Edge length of one atlas tile in pixels.
pub const TEXTURE_SIZE: u32 = 32;

/// Full-brightness light value; lightmap = light / MAX_LIGHT.
pub const MAX_LIGHT: i32 = 128;

/// Cells a wall ray may visit before it is treated as a miss.
pub const DEFAULT_STEP_BUDGET: u32 = 10_000;

/// Constant light added to every surface.
pub const DEFAULT_GLOBAL_ILLUMINATION: f32 = 0.08;
