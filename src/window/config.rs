use serde::{Deserialize, Serialize};

use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Standard decorated window at the configured resolution.
    #[default]
    Windowed,
    /// Exclusive hardware fullscreen at the configured resolution.
    Fullscreen,
    /// Borderless window sized to match the monitor's native resolution.
    Borderless,
}

impl WindowMode {
    /// Mode the toggle key switches to: windowed, borderless, exclusive, and
    /// back.
    pub fn next(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Borderless,
            WindowMode::Borderless => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        }
    }
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window configuration snapshot.
///
/// - **physical** dimensions are the actual pixel size of the OS window.
/// - **logical** dimensions are the framebuffer the raycaster renders into
///   (320 × 200 by default), upscaled to fit the physical size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub physical_width: u32,
    pub physical_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    /// 1280 × 800 window showing the 320 × 200 framebuffer at 4×.
    fn default() -> Self {
        Self {
            physical_width: 1280,
            physical_height: 800,
            logical_width: DISPLAY_WIDTH,
            logical_height: DISPLAY_HEIGHT,
            mode: WindowMode::Windowed,
        }
    }
}

impl WindowConfig {
    /// Aspect ratio of the **logical** resolution (`logical_width / logical_height`).
    ///
    /// Returns `0.0` when `logical_height` is zero to avoid division by zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.logical_height == 0 {
            return 0.0;
        }
        self.logical_width as f32 / self.logical_height as f32
    }

    /// Record a new physical size (window resize), keeping the logical one.
    pub fn with_physical(mut self, width: u32, height: u32) -> Self {
        self.physical_width = width;
        self.physical_height = height;
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
