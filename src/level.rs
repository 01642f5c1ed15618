// =============================================================================
// LEVEL — Tiled JSON maps: tile layers and placed objects
//
// Expected layout:
//   - tile layers named `walls`, `floor` and `ceiling` with array data
//   - any number of object groups; every object becomes a `PlacedObject`
// Tiled global ids are 1-based with 0 meaning "no tile"; the loader shifts
// them down by one so that both 0 and 1 end up empty.
// =============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::map::{GridMap, LayerKind, LightAccumulation};
use crate::MAX_LIGHT;

// ── Tiled JSON ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct TiledMap {
    width: u32,
    height: u32,
    #[serde(default = "default_tile_px")]
    tilewidth: u32,
    #[serde(default = "default_tile_px")]
    tileheight: u32,
    #[serde(default)]
    layers: Vec<TiledLayer>,
}

fn default_tile_px() -> u32 {
    crate::TEXTURE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
struct TiledLayer {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: Option<Vec<u32>>,
    #[serde(default)]
    objects: Option<Vec<TiledObject>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TiledObject {
    #[serde(default)]
    name: String,
    /// Tiled ≥ 1.9 writes `class` instead of `type`.
    #[serde(rename = "type", alias = "class", default)]
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    properties: Vec<TiledProperty>,
}

#[derive(Debug, Clone, Deserialize)]
struct TiledProperty {
    name: String,
    value: Value,
}

// ── PlacedObject ──────────────────────────────────────────────────────────────

/// What a placed object turns into when added to the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Static point light.
    Light,
    /// Point light plus a flicker process.
    FlickerLight,
    /// Sprite that hunts the player.
    Stalker,
    /// Player start position.
    PlayerStart,
    /// Static sprite named after its texture.
    Decoration,
}

impl ObjectKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "light" => ObjectKind::Light,
            "light-flicker" => ObjectKind::FlickerLight,
            "stalker" => ObjectKind::Stalker,
            "player" => ObjectKind::PlayerStart,
            _ => ObjectKind::Decoration,
        }
    }
}

/// An object from the level, with its position in cell units.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    pub name: String,
    pub kind: ObjectKind,
    pub position: Vec2,
    pub properties: HashMap<String, Value>,
}

impl PlacedObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind, position: Vec2) -> Self {
        Self { name: name.into(), kind, position, properties: HashMap::new() }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property_i64(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(Value::as_i64)
    }

    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Light intensity, `MAX_LIGHT` unless an `intensity` property says
    /// otherwise.
    pub fn intensity(&self) -> i32 {
        self.property_i64("intensity")
            .map(|v| v.clamp(0, i32::MAX as i64) as i32)
            .unwrap_or(MAX_LIGHT)
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Level {
    map: TiledMap,
    source: PathBuf,
}

impl Level {
    /// # Errors
    /// [`EngineError::Io`] if the file cannot be read, [`EngineError::Json`]
    /// if it is not a Tiled JSON map.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| EngineError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text, path.to_path_buf())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json, PathBuf::from("<memory>"))
    }

    fn parse(json: &str, source: PathBuf) -> Result<Self> {
        let map: TiledMap = serde_json::from_str(json)
            .map_err(|e| EngineError::Json { path: source.clone(), source: e })?;
        info!("level {source:?}: {}×{} cells, {} layers", map.width, map.height, map.layers.len());
        Ok(Self { map, source })
    }

    pub fn width(&self) -> u32 {
        self.map.width
    }

    pub fn height(&self) -> u32 {
        self.map.height
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Tile data of layer `name`, with ids shifted to 0-based.
    ///
    /// # Errors
    /// [`EngineError::LayerNotFound`] if no tile layer has that name.
    pub fn layer_data(&self, name: &str) -> Result<Vec<u32>> {
        self.map
            .layers
            .iter()
            .find(|l| l.name == name && l.data.is_some())
            .and_then(|l| l.data.as_ref())
            .map(|data| data.iter().map(|&id| id.saturating_sub(1)).collect())
            .ok_or_else(|| EngineError::LayerNotFound(name.to_string()))
    }

    /// Every object of every object group, converted to cell units.
    pub fn objects(&self) -> Vec<PlacedObject> {
        let tw = self.map.tilewidth.max(1) as f32;
        let th = self.map.tileheight.max(1) as f32;

        self.map
            .layers
            .iter()
            .filter(|l| l.kind == "objectgroup")
            .filter_map(|l| l.objects.as_ref())
            .flatten()
            .map(|o| PlacedObject {
                name: o.name.clone(),
                kind: ObjectKind::parse(&o.kind),
                position: Vec2::new(o.x / tw, o.y / th),
                properties: o
                    .properties
                    .iter()
                    .map(|p| (p.name.clone(), p.value.clone()))
                    .collect(),
            })
            .collect()
    }

    /// Grid with all three layers set and ceiling darkening applied.
    ///
    /// # Errors
    /// [`EngineError::LayerNotFound`] or [`EngineError::SizeMismatch`].
    pub fn build_map(&self, base_light: i32, accumulation: LightAccumulation) -> Result<GridMap> {
        let mut map = GridMap::new(self.map.width, self.map.height, base_light)
            .with_accumulation(accumulation);
        for kind in LayerKind::ALL {
            map.set_layer(kind, self.layer_data(kind.name())?)?;
        }
        map.auto_light_map();
        Ok(map)
    }
}
