// =============================================================================
// GEOMETRY.RS — Grid-space primitives shared by the casters and the lighting
//
// - Interpolation and distance helpers (light falloff, sprite ordering)
// - Grid DDA traversal (wall casting, light propagation)
// =============================================================================

use glam::{IVec2, Vec2};

/// Linear interpolation: `a` at `f = 0`, `b` at `f = 1`.
#[inline]
pub fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a * (1.0 - f) + b * f
}

/// Squared Euclidean distance (avoids sqrt).
/// Enough when distances are only compared, e.g. for painter's ordering.
#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Integer cell containing a world-space point (1 unit = 1 cell).
#[inline]
pub fn cell_of(p: Vec2) -> IVec2 {
    p.floor().as_ivec2()
}

// =============================================================================
// GRID DDA
// =============================================================================

/// Which kind of grid line a ray crossed on its last step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// An x = const line was crossed (the ray stepped along x).
    Vertical,
    /// A y = const line was crossed (the ray stepped along y).
    Horizontal,
}

/// Stand-in for an infinite per-cell distance when a ray component is zero.
/// Finite so that `0 * DELTA` stays 0 instead of NaN.
const NO_CROSSING: f32 = 1e30;

/// Digital differential analyser over the unit grid.
///
/// Each call to [`GridWalker::advance`] moves into the next cell the ray
/// enters, choosing whichever axis reaches its next grid line first.
#[derive(Clone, Debug)]
pub struct GridWalker {
    cell: IVec2,
    step: IVec2,
    side_dist: Vec2,
    delta_dist: Vec2,
    side: Side,
}

impl GridWalker {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        let cell = cell_of(origin);
        let delta_dist = Vec2::new(
            if dir.x == 0.0 { NO_CROSSING } else { (1.0 / dir.x).abs() },
            if dir.y == 0.0 { NO_CROSSING } else { (1.0 / dir.y).abs() },
        );

        let (step_x, side_x) = if dir.x < 0.0 {
            (-1, (origin.x - cell.x as f32) * delta_dist.x)
        } else {
            (1, (cell.x as f32 + 1.0 - origin.x) * delta_dist.x)
        };
        let (step_y, side_y) = if dir.y < 0.0 {
            (-1, (origin.y - cell.y as f32) * delta_dist.y)
        } else {
            (1, (cell.y as f32 + 1.0 - origin.y) * delta_dist.y)
        };

        Self {
            cell,
            step: IVec2::new(step_x, step_y),
            side_dist: Vec2::new(side_x, side_y),
            delta_dist,
            side: Side::Vertical,
        }
    }

    /// Step into the next cell and return it with the side that was crossed.
    pub fn advance(&mut self) -> (IVec2, Side) {
        if self.side_dist.x < self.side_dist.y {
            self.side_dist.x += self.delta_dist.x;
            self.cell.x += self.step.x;
            self.side = Side::Vertical;
        } else {
            self.side_dist.y += self.delta_dist.y;
            self.cell.y += self.step.y;
            self.side = Side::Horizontal;
        }
        (self.cell, self.side)
    }

    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Distance to the last crossed grid line, measured along the ray
    /// direction's projection rather than its length (no fisheye).
    pub fn perpendicular_distance(&self) -> f32 {
        match self.side {
            Side::Vertical => self.side_dist.x - self.delta_dist.x,
            Side::Horizontal => self.side_dist.y - self.delta_dist.y,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert!((lerp(0.0, 128.0, 0.2) - 25.6).abs() < 1e-4);
    }

    #[test]
    fn cell_of_negative_coordinates_floors() {
        assert_eq!(cell_of(Vec2::new(-0.5, 1.9)), IVec2::new(-1, 1));
    }

    #[test]
    fn walker_along_x_only_crosses_vertical_lines() {
        let mut w = GridWalker::new(Vec2::new(0.5, 0.5), Vec2::X);
        for expected_x in 1..5 {
            let (cell, side) = w.advance();
            assert_eq!(cell, IVec2::new(expected_x, 0));
            assert_eq!(side, Side::Vertical);
        }
        assert!((w.perpendicular_distance() - 3.5).abs() < 1e-5);
    }

    #[test]
    fn walker_steps_are_four_connected() {
        let mut w = GridWalker::new(Vec2::new(2.3, 7.1), Vec2::new(-0.8, 0.35));
        let mut prev = w.cell();
        for _ in 0..20 {
            let (cell, _) = w.advance();
            let d = (cell - prev).abs();
            assert_eq!(d.x + d.y, 1, "diagonal jump from {prev} to {cell}");
            prev = cell;
        }
    }
}
