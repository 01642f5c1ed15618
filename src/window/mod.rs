// =============================================================================
// WINDOW — Presentation mode of the OS window around the 320 × 200 view
//
// The framebuffer size never changes; only the OS window does. Windowed mode
// snaps to a whole multiple of the framebuffer so pixels stay square, and the
// fullscreen modes leave the scaling to the letterboxed blit.
// =============================================================================

pub mod config;

pub use config::{WindowConfig, WindowMode};

use log::{info, warn};
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

/// Put `window` into `config.mode`.
///
/// Exclusive fullscreen picks the monitor video mode nearest in area to the
/// configured physical size, and drops to borderless when the monitor reports
/// none.
pub fn apply_window_settings(window: &Window, config: &WindowConfig) {
    let fullscreen = match config.mode {
        WindowMode::Windowed => None,
        WindowMode::Borderless => Some(Fullscreen::Borderless(None)),
        WindowMode::Fullscreen => Some(exclusive_fullscreen(window, config)),
    };
    window.set_fullscreen(fullscreen);

    if config.mode == WindowMode::Windowed {
        window.set_decorations(true);
        window.set_min_inner_size(Some(PhysicalSize::new(config.logical_width, config.logical_height)));
        let monitor = window.current_monitor().map(|m| m.size());
        // A `None` here means the size arrives later as `WindowEvent::Resized`.
        let _ = window.request_inner_size(windowed_size(config, monitor));
    }
    info!("window mode: {:?}", config.mode);
}

fn exclusive_fullscreen(window: &Window, config: &WindowConfig) -> Fullscreen {
    let target = (config.physical_width, config.physical_height);
    let best = window.current_monitor().and_then(|monitor| {
        closest_by_area(monitor.video_modes().map(|vm| {
            let size = vm.size();
            (vm, (size.width, size.height))
        }), target)
    });
    match best {
        Some(vm) => Fullscreen::Exclusive(vm),
        None => {
            warn!("no video mode near {}×{}; using borderless", target.0, target.1);
            Fullscreen::Borderless(None)
        }
    }
}

/// Candidate whose `(width, height)` area is nearest to `target`'s.
/// The earliest one wins a tie.
pub fn closest_by_area<T>(
    candidates: impl IntoIterator<Item = (T, (u32, u32))>,
    target: (u32, u32),
) -> Option<T> {
    let area = |(w, h): (u32, u32)| w as u64 * h as u64;
    let target = area(target);
    let mut best: Option<(T, u64)> = None;
    for (item, size) in candidates {
        let diff = area(size).abs_diff(target);
        if best.as_ref().is_none_or(|&(_, d)| diff < d) {
            best = Some((item, diff));
        }
    }
    best.map(|(item, _)| item)
}

/// Inner size to request in windowed mode.
///
/// The configured physical size when it fits on `monitor` (or the monitor is
/// unknown); otherwise the largest whole multiple of the logical size that
/// does, never below 1×.
pub fn windowed_size(config: &WindowConfig, monitor: Option<PhysicalSize<u32>>) -> PhysicalSize<u32> {
    let requested = PhysicalSize::new(config.physical_width, config.physical_height);
    let Some(monitor) = monitor else {
        return requested;
    };
    if requested.width <= monitor.width && requested.height <= monitor.height {
        return requested;
    }
    let (lw, lh) = (config.logical_width, config.logical_height);
    if lw == 0 || lh == 0 {
        return requested;
    }
    let scale = (monitor.width / lw).min(monitor.height / lh).max(1);
    PhysicalSize::new(lw * scale, lh * scale)
}
