// =============================================================================
// CONFIG — Engine settings loaded from JSON, every field defaulted
// =============================================================================

use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::map::LightAccumulation;
use crate::player::{MovementSettings, LOOK_AHEAD};
use crate::raycaster::RenderSettings;
use crate::window::WindowConfig;
use crate::{DEFAULT_GLOBAL_ILLUMINATION, DEFAULT_STEP_BUDGET, TEXTURE_SIZE};

/// Ambient light level of open cells before any point light.
pub const DEFAULT_BASE_LIGHT: i32 = 48;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_title: String,
    /// Window size and framebuffer (logical) resolution.
    pub window: WindowConfig,
    /// Edge length of one atlas tile in pixels. Must be a power of two.
    pub texture_size: u32,
    /// Simulation interval in seconds.
    pub update_delay: f32,
    /// Darken every other framebuffer row when presenting.
    pub retro_scanlines: bool,

    /// Radians per second.
    pub player_rotation_speed: f32,
    /// Cells per second.
    pub player_movement_speed: f32,
    pub player_run_speed: f32,
    pub player_start: [f32; 2],
    /// Initial facing in radians (0 = +x).
    pub player_angle: f32,

    /// Texture name → image path.
    pub textures: BTreeMap<String, PathBuf>,
    /// Which entry of `textures` holds the wall/floor/ceiling tiles.
    pub tile_atlas: String,
    /// Optional folder scanned for additional `.png` sprites.
    pub sprite_folder: Option<PathBuf>,
    /// Tiled JSON level.
    pub level: PathBuf,

    pub base_light: i32,
    pub light_accumulation: LightAccumulation,
    pub step_budget: u32,
    pub global_illumination: f32,
    /// Seed for light flicker and entity randomness.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let textures = [
            ("hand", "assets/hand.png"),
            ("textures", "assets/textures.png"),
            ("dungeon", "assets/dungeon.png"),
            ("background", "assets/backdrop.png"),
            ("mask", "assets/sprites/mask.png"),
            ("spearhead", "assets/sprites/spear-head.png"),
            ("statue", "assets/sprites/statue-1.png"),
            ("candles", "assets/sprites/candles.png"),
            ("cage", "assets/sprites/cage.png"),
            ("skull", "assets/sprites/skull-1.png"),
            ("hook", "assets/sprites/hook.png"),
            ("barell", "assets/sprites/barell.png"),
            ("tree-1", "assets/sprites/tree-1.png"),
            ("tree-2", "assets/sprites/tree-2.png"),
            ("bed", "assets/sprites/bed.png"),
            ("stool", "assets/sprites/stool.png"),
            ("infusion", "assets/sprites/infusion.png"),
            ("infusion-2", "assets/sprites/infusion2.png"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
        .collect();

        Self {
            window_title: "Renegade Engine".to_string(),
            window: WindowConfig::default(),
            texture_size: TEXTURE_SIZE,
            update_delay: 0.016,
            retro_scanlines: false,
            player_rotation_speed: 2.0,
            player_movement_speed: 2.0,
            player_run_speed: 5.66,
            player_start: [17.0, 15.0],
            player_angle: std::f32::consts::PI,
            textures,
            tile_atlas: "textures".to_string(),
            sprite_folder: None,
            level: PathBuf::from("assets/maps/testmap/testmap-1.json"),
            base_light: DEFAULT_BASE_LIGHT,
            light_accumulation: LightAccumulation::default(),
            step_budget: DEFAULT_STEP_BUDGET,
            global_illumination: DEFAULT_GLOBAL_ILLUMINATION,
            seed: 0x5EED,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config. A missing file yields the defaults.
    ///
    /// # Errors
    /// [`EngineError::Io`] for unreadable files, [`EngineError::Json`] for
    /// malformed ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                warn!("config {path:?} not found; using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(EngineError::Io { path: path.to_path_buf(), source }),
        };
        let config = serde_json::from_str(&text)
            .map_err(|source| EngineError::Json { path: path.to_path_buf(), source })?;
        info!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn display_size(&self) -> (u32, u32) {
        (self.window.logical_width, self.window.logical_height)
    }

    pub fn player_start(&self) -> Vec2 {
        Vec2::from(self.player_start)
    }

    pub fn movement(&self) -> MovementSettings {
        MovementSettings {
            rotation_speed: self.player_rotation_speed,
            movement_speed: self.player_movement_speed,
            run_speed: self.player_run_speed,
            look_ahead: LOOK_AHEAD,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            step_budget: self.step_budget,
            global_illumination: self.global_illumination,
        }
    }
}
