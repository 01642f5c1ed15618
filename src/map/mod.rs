// =============================================================================
// MAP — Cell grid: tile layers, integer light and the derived lightmap
//
// Every layer is a flat `Vec` indexed `y * width + x`. All layers share the
// same length, which is enforced on every write.
// =============================================================================

pub mod lighting;

pub use lighting::{LightAccumulation, CEILING_DARKENING, LIGHT_FALLOFF, LIGHT_RAYS};

use std::fmt;

use glam::{IVec2, Vec2};

use crate::error::{EngineError, Result};
use crate::geometry::cell_of;
use crate::MAX_LIGHT;

/// Tile id meaning "nothing here".
pub const EMPTY: u32 = 0;

/// One of the three tile layers of a [`GridMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Walls,
    Floor,
    Ceiling,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Walls, LayerKind::Floor, LayerKind::Ceiling];

    /// Layer name as it appears in level files.
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Walls => "walls",
            LayerKind::Floor => "floor",
            LayerKind::Ceiling => "ceiling",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The level grid.
///
/// Built once from layer arrays; after that only the light values change.
/// `Clone` is cheap enough for copy-on-write through `Arc::make_mut`, which is
/// how the simulation publishes lighting changes without touching a map the
/// renderer still holds.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: u32,
    height: u32,
    walls: Vec<u32>,
    floor: Vec<u32>,
    ceiling: Vec<u32>,
    light: Vec<i32>,
    lightmap: Vec<f32>,
    /// Light before any point source: base level, ceiling darkening and
    /// baked propagation.
    baseline: Vec<i32>,
    /// Point lights in registration order, `(cell index, value)`.
    sources: Vec<(usize, i32)>,
    base_light: i32,
    accumulation: LightAccumulation,
}

impl GridMap {
    /// Empty grid (no tiles) with every cell at `base_light`.
    pub fn new(width: u32, height: u32, base_light: i32) -> Self {
        let len = width as usize * height as usize;
        let mut map = Self {
            width,
            height,
            walls: vec![EMPTY; len],
            floor: vec![EMPTY; len],
            ceiling: vec![EMPTY; len],
            light: vec![base_light; len],
            lightmap: vec![0.0; len],
            baseline: vec![base_light; len],
            sources: Vec::new(),
            base_light,
            accumulation: LightAccumulation::default(),
        };
        map.rebuild_lightmap();
        map
    }

    pub fn with_accumulation(mut self, accumulation: LightAccumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub fn set_accumulation(&mut self, accumulation: LightAccumulation) {
        self.accumulation = accumulation;
    }

    pub fn accumulation(&self) -> LightAccumulation {
        self.accumulation
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Ambient light level that propagation decays toward.
    pub fn base_light(&self) -> i32 {
        self.base_light
    }

    // ── Layers ──────────────────────────────────────────────────────────────

    /// Replace a whole tile layer.
    ///
    /// # Errors
    /// [`EngineError::SizeMismatch`] if `data` does not hold exactly
    /// `width * height` cells. The map is left untouched.
    pub fn set_layer(&mut self, kind: LayerKind, data: Vec<u32>) -> Result<()> {
        if data.len() != self.len() {
            return Err(EngineError::SizeMismatch {
                layer: kind,
                expected: self.len(),
                actual: data.len(),
            });
        }
        *self.layer_mut(kind) = data;
        Ok(())
    }

    pub fn layer(&self, kind: LayerKind) -> &[u32] {
        match kind {
            LayerKind::Walls => &self.walls,
            LayerKind::Floor => &self.floor,
            LayerKind::Ceiling => &self.ceiling,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Vec<u32> {
        match kind {
            LayerKind::Walls => &mut self.walls,
            LayerKind::Floor => &mut self.floor,
            LayerKind::Ceiling => &mut self.ceiling,
        }
    }

    /// Tile id at `cell`, or `None` outside the grid.
    pub fn tile(&self, kind: LayerKind, cell: IVec2) -> Option<u32> {
        self.index(cell.x, cell.y).map(|i| self.layer(kind)[i])
    }

    // ── Indexing ────────────────────────────────────────────────────────────

    /// Flat index of `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Flat index of the cell containing a world position.
    pub fn cell_index(&self, position: Vec2) -> Option<usize> {
        let cell = cell_of(position);
        self.index(cell.x, cell.y)
    }

    /// `(x, y)` of a flat index. No range check.
    #[inline]
    pub fn coords(&self, index: usize) -> IVec2 {
        let w = self.width.max(1) as usize;
        IVec2::new((index % w) as i32, (index / w) as i32)
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.index(cell.x, cell.y).is_some()
    }

    // ── Collision ───────────────────────────────────────────────────────────

    /// True for wall cells and for indices outside the grid.
    pub fn is_blocked(&self, index: usize) -> bool {
        self.walls.get(index).is_none_or(|&id| id != EMPTY)
    }

    /// [`GridMap::is_blocked`] by coordinates.
    pub fn is_blocked_at(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_none_or(|i| self.walls[i] != EMPTY)
    }

    // ── Light ───────────────────────────────────────────────────────────────

    /// Raw integer light values, one per cell.
    pub fn light(&self) -> &[i32] {
        &self.light
    }

    /// Normalised light (`light / MAX_LIGHT`), one per cell.
    pub fn lightmap(&self) -> &[f32] {
        &self.lightmap
    }

    /// Lightmap value at `cell`, or `None` outside the grid.
    #[inline]
    pub fn lightmap_at(&self, cell: IVec2) -> Option<f32> {
        self.index(cell.x, cell.y).map(|i| self.lightmap[i])
    }

    pub(crate) fn rebuild_lightmap(&mut self) {
        let max = MAX_LIGHT as f32;
        self.lightmap.clear();
        self.lightmap.extend(self.light.iter().map(|&l| l as f32 / max));
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_empty_at_base_light() {
        let map = GridMap::new(4, 3, 32);
        assert_eq!(map.len(), 12);
        assert!(map.layer(LayerKind::Walls).iter().all(|&t| t == EMPTY));
        assert!(map.light().iter().all(|&l| l == 32));
        assert!(map.lightmap().iter().all(|&l| (l - 0.25).abs() < 1e-6));
    }

    #[test]
    fn set_layer_rejects_wrong_length() {
        let mut map = GridMap::new(2, 2, 0);
        let err = map.set_layer(LayerKind::Floor, vec![1; 3]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SizeMismatch { layer: LayerKind::Floor, expected: 4, actual: 3 }
        ));
        assert!(map.layer(LayerKind::Floor).iter().all(|&t| t == EMPTY));
    }

    #[test]
    fn index_is_row_major_and_bounds_checked() {
        let map = GridMap::new(5, 4, 0);
        assert_eq!(map.index(2, 3), Some(17));
        assert_eq!(map.coords(17), IVec2::new(2, 3));
        assert_eq!(map.index(5, 0), None);
        assert_eq!(map.index(-1, 0), None);
        assert_eq!(map.cell_index(Vec2::new(4.9, 3.1)), Some(19));
    }

    #[test]
    fn out_of_range_is_blocked() {
        let mut map = GridMap::new(2, 1, 0);
        map.set_layer(LayerKind::Walls, vec![0, 3]).unwrap();
        assert!(!map.is_blocked(0));
        assert!(map.is_blocked(1));
        assert!(map.is_blocked(2));
        assert!(map.is_blocked_at(-1, 0));
    }

    #[test]
    fn layer_kind_displays_level_name() {
        assert_eq!(LayerKind::Ceiling.to_string(), "ceiling");
    }
}
