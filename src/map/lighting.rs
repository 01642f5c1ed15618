// =============================================================================
// LIGHTING — Load-time ceiling darkening and runtime point-light propagation
//
// Light is an integer per cell. A point light seeds its own cell and then
// casts rays outward; each ray walks the grid with a DDA, decaying toward the
// ambient level as it goes. Walls catch half of what reaches them and stop
// the ray.
//
// The grid keeps the static level (base light, ceiling darkening, baked
// lights) apart from the point lights. Any change to a point light re-lights
// the grid from the static level, so a light re-set every tick replaces its
// previous contribution.
// =============================================================================

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{GridMap, EMPTY};
use crate::error::{EngineError, Result};
use crate::geometry::{lerp, GridWalker};
use crate::MAX_LIGHT;

/// Rays cast per point light, at equal angles.
pub const LIGHT_RAYS: u32 = 16;

/// Share of the running intensity a ray keeps at each step.
pub const LIGHT_FALLOFF: f32 = 0.2;

/// Covered (ceilinged, open) cells get their light divided by this at load.
pub const CEILING_DARKENING: i32 = 3;

/// How a ray combines with a cell already lit by another source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightAccumulation {
    /// Plain sum. Overlapping lights can push a cell past `MAX_LIGHT`.
    Additive,
    /// Sum clamped to `MAX_LIGHT`; a value already above the clamp is kept.
    #[default]
    Saturating,
}

impl LightAccumulation {
    pub fn combine(self, existing: i32, incoming: i32) -> i32 {
        match self {
            LightAccumulation::Additive => existing + incoming,
            LightAccumulation::Saturating => {
                existing.max((existing + incoming).min(MAX_LIGHT))
            }
        }
    }
}

impl GridMap {
    /// Darken every covered open cell: ceiling present, no wall.
    pub fn auto_light_map(&mut self) {
        for i in 0..self.baseline.len() {
            if self.ceiling[i] != EMPTY && self.walls[i] == EMPTY {
                self.baseline[i] = self.baseline[i].div_euclid(CEILING_DARKENING);
            }
        }
        self.relight();
    }

    /// Raw light value of cell `index`.
    ///
    /// # Errors
    /// [`EngineError::LightIndexOutOfRange`] outside the grid.
    pub fn get_light_at(&self, index: usize) -> Result<i32> {
        self.light
            .get(index)
            .copied()
            .ok_or(EngineError::LightIndexOutOfRange { index, len: self.light.len() })
    }

    /// Make cell `index` a point light of `value` and spread it to the
    /// surroundings.
    ///
    /// Setting the same cell again replaces that light's earlier
    /// contribution rather than stacking on top of it.
    ///
    /// # Errors
    /// [`EngineError::LightIndexOutOfRange`] outside the grid; nothing is
    /// modified in that case.
    pub fn set_light(&mut self, index: usize, value: i32) -> Result<()> {
        let len = self.light.len();
        if index >= len {
            return Err(EngineError::LightIndexOutOfRange { index, len });
        }
        match self.sources.iter_mut().find(|(i, _)| *i == index) {
            Some(source) => source.1 = value,
            None => self.sources.push((index, value)),
        }
        self.relight();
        Ok(())
    }

    /// Point lights as `(cell index, value)`, in the order they were first set.
    pub fn light_sources(&self) -> &[(usize, i32)] {
        &self.sources
    }

    /// Bake a light of `normalized` strength (1.0 = `MAX_LIGHT`) from the
    /// centre of cell `(x, y)` into the static light level. The source cell
    /// keeps its value. Does nothing outside the grid.
    pub fn propagate_light(&mut self, x: i32, y: i32, normalized: f32) {
        if self.index(x, y).is_none() {
            return;
        }
        let mut baseline = std::mem::take(&mut self.baseline);
        self.cast_light(&mut baseline, x, y, normalized);
        self.baseline = baseline;
        self.relight();
    }

    /// Rebuild `light` from the static level plus every point light in order.
    fn relight(&mut self) {
        let mut light = std::mem::take(&mut self.light);
        light.clone_from(&self.baseline);
        for &(index, value) in &self.sources {
            light[index] = value;
            let cell = self.coords(index);
            self.cast_light(&mut light, cell.x, cell.y, value as f32 / MAX_LIGHT as f32);
        }
        self.light = light;
        self.rebuild_lightmap();
    }

    /// Cast the 16 rays of one light into `light`.
    ///
    /// Each ray keeps a running intensity; the value arriving at the next cell
    /// is `lerp(ambient, running, LIGHT_FALLOFF)`. The ray stops once that
    /// value, truncated, is no brighter than ambient or the ray leaves the
    /// grid.
    fn cast_light(&self, light: &mut [i32], x: i32, y: i32, normalized: f32) {
        let ambient = self.base_light;
        let origin = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let seed = normalized * MAX_LIGHT as f32;

        for ray in 0..LIGHT_RAYS {
            let dir = Vec2::from_angle(ray as f32 * TAU / LIGHT_RAYS as f32);
            let mut walker = GridWalker::new(origin, dir);
            let mut running = seed;

            loop {
                let (cell, _) = walker.advance();
                let computed = lerp(ambient as f32, running, LIGHT_FALLOFF);
                let arriving = computed as i32;
                if arriving <= ambient {
                    break;
                }
                let Some(i) = self.index(cell.x, cell.y) else {
                    break;
                };

                if self.walls[i] != EMPTY {
                    light[i] = arriving / 2;
                    break;
                }

                let existing = light[i];
                if existing != ambient && existing != arriving {
                    // Lit by another source: combine and carry on undecayed.
                    light[i] = self.accumulation.combine(existing, arriving);
                } else {
                    light[i] = arriving;
                    running = computed;
                }
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
