use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::config::EngineConfig;
use gridcaster::display::Display;
use gridcaster::input::{Action, ActionMap, InputEvent, InputSource, InputState};
use gridcaster::level::Level;
use gridcaster::raycaster::Raycaster;
use gridcaster::runtime::{SimulationHandle, SnapshotReader};
use gridcaster::textures::{TextureStore, TileAtlas};
use gridcaster::window::apply_window_settings;
use gridcaster::world::World;

const DEFAULT_CONFIG: &str = "gridcaster.json";

// ── Asset loading ────────────────────────────────────────────────────────────

fn load_textures(config: &EngineConfig) -> anyhow::Result<TextureStore> {
    let mut store = TextureStore::new();
    for (name, path) in &config.textures {
        if let Err(e) = store.load(name.as_str(), path) {
            if *name == config.tile_atlas {
                return Err(e).context("loading the tile atlas");
            }
            warn!("{e}; texture '{name}' unavailable");
        }
    }
    if let Some(folder) = &config.sprite_folder {
        store
            .load_folder(folder)
            .with_context(|| format!("loading sprites from {folder:?}"))?;
    }
    info!("{} textures loaded", store.len());
    Ok(store)
}

// ── App (winit ApplicationHandler) ───────────────────────────────────────────

struct App {
    config: EngineConfig,
    raycaster: Raycaster,
    simulation: SimulationHandle,
    reader: SnapshotReader,
    bindings: ActionMap<Action>,
    input: InputState,
    display: Option<Display>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn forward_key(&mut self, code: KeyCode, state: ElementState) {
        let source = InputSource::Key(code);
        let event: fn(Action) -> InputEvent = match state {
            ElementState::Pressed if self.input.press_key(code) => InputEvent::Pressed,
            ElementState::Released if self.input.release_key(code) => InputEvent::Released,
            _ => return,
        };
        for action in self.bindings.actions_for(source) {
            if !self.simulation.send(event(action)) {
                warn!("simulation is gone; input dropped");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(&self.config.window_title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.physical_width,
                self.config.window.physical_height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.failure = Some(anyhow!(e).context("creating the window"));
                event_loop.exit();
                return;
            }
        };
        apply_window_settings(&window, &self.config.window);

        match pollster::block_on(Display::new(
            window,
            self.config.window.clone(),
            self.config.retro_scanlines,
        )) {
            Ok(display) => self.display = Some(display),
            Err(e) => {
                self.failure = Some(anyhow!(e).context("initialising the display"));
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(display) = self.display.as_ref() {
            display.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(display) = self.display.as_mut() {
                    display.resize(size);
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::F2 if state == ElementState::Pressed => {
                    if let Some(display) = self.display.as_mut() {
                        let on = !display.scanlines();
                        display.set_scanlines(on);
                    }
                }
                KeyCode::F11 if state == ElementState::Pressed => {
                    if let Some(display) = self.display.as_ref() {
                        self.config.window.mode = self.config.window.mode.next();
                        apply_window_settings(&display.window, &self.config.window);
                    }
                }
                _ => self.forward_key(code, state),
            },

            WindowEvent::RedrawRequested => {
                let Some(display) = self.display.as_mut() else { return };
                let snapshot = self.reader.refresh();
                let frame = self.raycaster.render_frame(snapshot);

                match display.present(frame) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = display.window.inner_size();
                        display.resize(size);
                    }
                    Err(e) => error!("present failed: {e}"),
                }
                self.input.clear_frame_state();
            }

            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = EngineConfig::load(&config_path)
        .with_context(|| format!("reading config {config_path:?}"))?;

    let textures = load_textures(&config)?;
    let atlas_image = textures
        .by_name(&config.tile_atlas)
        .cloned()
        .ok_or_else(|| anyhow!("tile atlas texture '{}' is not loaded", config.tile_atlas))?;
    let atlas = TileAtlas::new(atlas_image, config.texture_size).context("building the tile atlas")?;

    let level = Level::load(&config.level).with_context(|| format!("loading level {:?}", config.level))?;
    let world = World::from_level(&level, &textures, &config).context("populating the world")?;

    let simulation = SimulationHandle::spawn(world, Duration::from_secs_f32(config.update_delay))
        .context("starting the simulation")?;
    let reader = simulation.reader();

    let (width, height) = config.display_size();
    let raycaster = Raycaster::new(width, height, atlas, textures, config.render_settings());

    let event_loop = EventLoop::new().context("creating the event loop")?;
    let mut app = App {
        config,
        raycaster,
        simulation,
        reader,
        bindings: ActionMap::default_bindings(),
        input: InputState::new(),
        display: None,
        failure: None,
    };
    event_loop.run_app(&mut app).context("running the event loop")?;

    if let Some(world) = app.simulation.stop() {
        info!("shut down after {} simulation ticks", world.tick());
    }
    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
