use gridcaster::display::{letterbox_viewport, Viewport};
use gridcaster::window::*;
use winit::dpi::PhysicalSize;

#[test]
fn default_is_320x200_shown_at_4x() {
    let cfg = WindowConfig::default();
    assert_eq!(cfg.physical_width,  1280);
    assert_eq!(cfg.physical_height, 800);
    assert_eq!(cfg.logical_width,   320);
    assert_eq!(cfg.logical_height,  200);
    assert_eq!(cfg.mode, WindowMode::Windowed);
}

#[test]
fn aspect_ratio_is_sixteen_by_ten() {
    let ratio = WindowConfig::default().aspect_ratio();
    assert!((ratio - 1.6).abs() < 1e-5, "expected 1.6, got {ratio}");
}

#[test]
fn aspect_ratio_zero_height_returns_zero() {
    let cfg = WindowConfig {
        physical_width: 0, physical_height: 0,
        logical_width: 320, logical_height: 0,
        mode: WindowMode::Windowed,
    };
    assert_eq!(cfg.aspect_ratio(), 0.0);
}

#[test]
fn resize_keeps_the_framebuffer_size() {
    let cfg = WindowConfig::default().with_physical(1920, 1080);
    assert_eq!((cfg.physical_width, cfg.physical_height), (1920, 1080));
    assert_eq!((cfg.logical_width, cfg.logical_height), (320, 200));
}

#[test]
fn mode_round_trips_through_json() {
    let cfg: WindowConfig = serde_json::from_str(r#"{ "mode": "borderless" }"#).unwrap();
    assert_eq!(cfg.mode, WindowMode::Borderless);
    assert_eq!(cfg.logical_width, 320);
}

#[test]
fn full_hd_gets_side_bars() {
    let v = letterbox_viewport(&WindowConfig::default().with_physical(1920, 1080));
    // Height-limited: 1080 / 200 = 5.4.
    assert!((v.height - 1080.0).abs() < 1e-3);
    assert!((v.width - 1728.0).abs() < 1e-3);
    assert!((v.x - 96.0).abs() < 1e-3);
    assert_ne!(v, Viewport::ZERO);
}

#[test]
fn toggle_cycles_through_every_mode() {
    let start = WindowMode::Windowed;
    assert_eq!(start.next(), WindowMode::Borderless);
    assert_eq!(start.next().next(), WindowMode::Fullscreen);
    assert_eq!(start.next().next().next(), start);
}

#[test]
fn video_mode_nearest_in_area_wins() {
    let modes = [("vga", (640, 480)), ("hd", (1280, 720)), ("fhd", (1920, 1080))];
    assert_eq!(closest_by_area(modes, (1280, 800)), Some("hd"));
    assert_eq!(closest_by_area(modes, (4000, 3000)), Some("fhd"));
    assert_eq!(closest_by_area(Vec::<((), (u32, u32))>::new(), (1280, 800)), None);
}

#[test]
fn equal_area_tie_keeps_the_first_mode() {
    let modes = [("wide", (1600, 600)), ("tall", (600, 1600))];
    assert_eq!(closest_by_area(modes, (960, 1000)), Some("wide"));
}

#[test]
fn windowed_size_is_kept_when_it_fits() {
    let cfg = WindowConfig::default();
    assert_eq!(windowed_size(&cfg, None), PhysicalSize::new(1280, 800));
    assert_eq!(windowed_size(&cfg, Some(PhysicalSize::new(1920, 1080))), PhysicalSize::new(1280, 800));
}

#[test]
fn windowed_size_snaps_to_a_whole_multiple_on_small_monitors() {
    let cfg = WindowConfig::default();
    // 1024 / 320 = 3, 768 / 200 = 3.
    assert_eq!(windowed_size(&cfg, Some(PhysicalSize::new(1024, 768))), PhysicalSize::new(960, 600));
    // Never below 1×.
    assert_eq!(windowed_size(&cfg, Some(PhysicalSize::new(200, 100))), PhysicalSize::new(320, 200));
}
