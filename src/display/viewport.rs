// ── Letterbox viewport math ───────────────────────────────────────────────────
//
// Largest uniformly scaled rectangle of the logical (framebuffer) resolution
// that fits inside the physical (window) resolution, centred on both axes.

use crate::window::WindowConfig;

/// Axis-aligned rectangle in physical pixels, ready for `set_viewport`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const ZERO: Viewport = Viewport { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }

    /// Physical scale factor applied to the logical resolution.
    pub fn scale(&self, config: &WindowConfig) -> f32 {
        if config.logical_width == 0 {
            return 0.0;
        }
        self.width / config.logical_width as f32
    }
}

/// Calculate the letterbox `Viewport` for `config`.
///
/// ```text
/// scale = min(physical_width / logical_width, physical_height / logical_height)
/// x     = (physical_width  - logical_width  * scale) / 2
/// y     = (physical_height - logical_height * scale) / 2
/// ```
///
/// A zero logical dimension yields [`Viewport::ZERO`].
pub fn letterbox_viewport(config: &WindowConfig) -> Viewport {
    if config.logical_width == 0 || config.logical_height == 0 {
        return Viewport::ZERO;
    }

    let pw = config.physical_width as f32;
    let ph = config.physical_height as f32;
    let lw = config.logical_width as f32;
    let lh = config.logical_height as f32;

    let scale = (pw / lw).min(ph / lh);
    let width = lw * scale;
    let height = lh * scale;

    Viewport { x: (pw - width) / 2.0, y: (ph - height) / 2.0, width, height }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
