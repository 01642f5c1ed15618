// =============================================================================
// WORLD — Simulation state: grid, sprites, light processes, entities, camera
//
// Owned by the simulation thread. The renderer only ever sees the immutable
// `FrameSnapshot`s this produces; map lighting is copy-on-write so a
// published snapshot is never modified.
// =============================================================================

pub mod entities;
pub mod process;

pub use entities::Stalker;
pub use process::{Flicker, LightChange, LightProcess};

use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::input::{ActionState, InputEvent};
use crate::level::{Level, ObjectKind, PlacedObject};
use crate::map::GridMap;
use crate::player::{self, MovementSettings};
use crate::raycaster::{SpriteId, SpriteTable};
use crate::runtime::FrameSnapshot;
use crate::textures::{TextureHandle, TextureStore};

pub struct World {
    map: Arc<GridMap>,
    sprites: SpriteTable,
    processes: Vec<LightProcess>,
    stalkers: Vec<Stalker>,
    camera: Camera,
    actions: ActionState,
    movement: MovementSettings,
    rng: StdRng,
    tick: u64,
}

impl World {
    pub fn new(map: GridMap, camera: Camera, seed: u64) -> Self {
        Self {
            map: Arc::new(map),
            sprites: SpriteTable::new(),
            processes: Vec::new(),
            stalkers: Vec::new(),
            camera,
            actions: ActionState::new(),
            movement: MovementSettings::default(),
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
        }
    }

    pub fn with_movement(mut self, movement: MovementSettings) -> Self {
        self.movement = movement;
        self
    }

    /// Build the grid from `level` and add every placed object.
    ///
    /// # Errors
    /// Missing layers or mismatched layer sizes.
    pub fn from_level(level: &Level, textures: &TextureStore, config: &EngineConfig) -> Result<Self> {
        let map = level.build_map(config.base_light, config.light_accumulation)?;
        let camera = Camera::from_angle(config.player_start(), config.player_angle);
        let mut world = World::new(map, camera, config.seed).with_movement(config.movement());

        let objects = level.objects();
        for object in &objects {
            world.add_object(object, textures)?;
        }
        info!(
            "world ready: {} objects, {} sprites, {} light processes, {} stalkers",
            objects.len(),
            world.sprites.len(),
            world.processes.len(),
            world.stalkers.len()
        );
        Ok(world)
    }

    // ── Objects & sprites ───────────────────────────────────────────────────

    /// Instantiate a level object: a light, a flickering light, a stalker, the
    /// player start, or a decoration sprite named after its texture.
    ///
    /// Objects outside the grid and decorations without a matching texture
    /// are skipped with a warning.
    pub fn add_object(&mut self, object: &PlacedObject, textures: &TextureStore) -> Result<()> {
        match object.kind {
            ObjectKind::Light | ObjectKind::FlickerLight => {
                let Some(index) = self.map.cell_index(object.position) else {
                    warn!("light '{}' at {} lies outside the grid; skipping", object.name, object.position);
                    return Ok(());
                };
                let intensity = object.intensity();
                self.set_light(index, intensity)?;
                if object.kind == ObjectKind::FlickerLight {
                    let mut flicker = Flicker::new(index, intensity);
                    if let Some(amp) = object.property_i64("amplitude") {
                        flicker = flicker.with_amplitude(amp.clamp(0, i32::MAX as i64) as i32);
                    }
                    self.add_process(LightProcess::Flicker(flicker));
                }
            }
            ObjectKind::PlayerStart => {
                self.camera.position = object.position;
                if let Some(deg) = object.property_f64("angle") {
                    self.camera = Camera::from_angle(object.position, (deg as f32).to_radians());
                }
            }
            ObjectKind::Stalker => match textures.handle(&object.name) {
                Some(texture) => {
                    self.add_stalker(object.position, texture);
                }
                None => warn!("stalker texture '{}' not loaded; skipping", object.name),
            },
            ObjectKind::Decoration => match textures.handle(&object.name) {
                Some(texture) => {
                    self.add_sprite(object.position, texture);
                }
                None => warn!("unknown object '{}'; skipping", object.name),
            },
        }
        Ok(())
    }

    pub fn add_sprite(&mut self, position: Vec2, texture: TextureHandle) -> SpriteId {
        self.sprites.insert(position, texture)
    }

    /// Unknown ids are a no-op returning `false`.
    pub fn set_sprite_position(&mut self, id: SpriteId, position: Vec2) -> bool {
        self.sprites.set_position(id, position)
    }

    /// Remove a sprite and any entity driving it.
    pub fn remove_sprite(&mut self, id: SpriteId) -> bool {
        self.stalkers.retain(|s| s.sprite != id);
        self.sprites.remove(id).is_some()
    }

    pub fn add_stalker(&mut self, position: Vec2, texture: TextureHandle) -> SpriteId {
        let id = self.add_sprite(position, texture);
        self.stalkers.push(Stalker::new(id, position));
        id
    }

    pub fn add_process(&mut self, process: LightProcess) {
        self.processes.push(process);
    }

    // ── Light ───────────────────────────────────────────────────────────────

    /// See [`GridMap::set_light`]. The map is cloned first if a snapshot still
    /// shares it.
    pub fn set_light(&mut self, index: usize, value: i32) -> Result<()> {
        if index >= self.map.len() {
            return Err(EngineError::LightIndexOutOfRange { index, len: self.map.len() });
        }
        Arc::make_mut(&mut self.map).set_light(index, value)
    }

    pub fn get_light_at(&self, index: usize) -> Result<i32> {
        self.map.get_light_at(index)
    }

    pub fn is_blocked(&self, index: usize) -> bool {
        self.map.is_blocked(index)
    }

    // ── Simulation ──────────────────────────────────────────────────────────

    pub fn apply_input(&mut self, event: InputEvent) {
        self.actions.apply(event);
    }

    /// One simulation tick: player movement, light processes, entities.
    pub fn update(&mut self, dt: f32) {
        self.tick += 1;

        player::apply_actions(&mut self.camera, &self.actions, &self.map, &self.movement, dt);

        for process in &mut self.processes {
            let Some(change) = process.update(dt, &mut self.rng) else {
                continue;
            };
            debug!("flicker at cell {} -> {}", change.index, change.value);
            if let Err(e) = Arc::make_mut(&mut self.map).set_light(change.index, change.value) {
                warn!("light process dropped a write: {e}");
            }
        }

        for stalker in &mut self.stalkers {
            let position = stalker.update(dt, &self.map, self.camera.position, &mut self.rng);
            self.sprites.set_position(stalker.sprite, position);
        }
    }

    /// Immutable view for the renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            camera: self.camera,
            map: Arc::clone(&self.map),
            sprites: self.sprites.clone(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn sprites(&self) -> &SpriteTable {
        &self.sprites
    }

    pub fn processes(&self) -> &[LightProcess] {
        &self.processes
    }

    pub fn stalkers(&self) -> &[Stalker] {
        &self.stalkers
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}
