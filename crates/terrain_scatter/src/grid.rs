//! Uniform spatial hash over the horizontal plane.
//!
//! [`SpatialGrid`] buckets horizontal positions into square cells so overlap
//! queries only inspect the 3×3 neighborhood around a position. Cell size is
//! `2 × min_distance`, which makes that neighborhood sufficient for any query
//! radius up to the cell size.
use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::point::ScatterPoint;

/// Uniform-cell hash grid keyed by `IVec2` cell coordinates.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<IVec2, Vec<Vec2>>,
    len: usize,
}

impl SpatialGrid {
    /// Creates a grid whose cell size is `2 × min_distance`.
    ///
    /// Non-positive or non-finite distances fall back to a unit cell; such a
    /// grid never reports overlaps for those distances anyway.
    pub fn new(min_distance: f32) -> Self {
        let cell_size = if min_distance.is_finite() && min_distance > 0.0 {
            min_distance * 2.0
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    /// Builds a grid and inserts every point of `points`.
    pub fn from_points(min_distance: f32, points: &[ScatterPoint]) -> Self {
        let mut grid = Self::new(min_distance);
        for p in points {
            grid.add_point(p);
        }
        grid
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell coordinate containing a horizontal position.
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        IVec2::new(
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Inserts a horizontal position into its cell.
    pub fn add(&mut self, position: Vec2) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(position);
        self.len += 1;
    }

    #[inline]
    pub fn add_point(&mut self, point: &ScatterPoint) {
        self.add(point.xz());
    }

    /// True if any stored position lies strictly closer than `min_distance`
    /// to `position`.
    pub fn overlaps(&self, position: Vec2, min_distance: f32) -> bool {
        if self.len == 0 || min_distance.is_nan() || min_distance <= 0.0 {
            return false;
        }
        debug_assert!(
            min_distance <= self.cell_size,
            "query distance {min_distance} exceeds grid cell size {}",
            self.cell_size
        );

        let min_d2 = min_distance * min_distance;
        let center = self.cell_of(position);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let Some(bucket) = self.cells.get(&(center + IVec2::new(dx, dz))) else {
                    continue;
                };
                if bucket
                    .iter()
                    .any(|other| other.distance_squared(position) < min_d2)
                {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_never_overlaps() {
        let grid = SpatialGrid::new(1.0);
        assert!(grid.is_empty());
        assert!(!grid.overlaps(Vec2::ZERO, 1.0));
    }

    #[test]
    fn cell_size_is_twice_min_distance() {
        assert_eq!(SpatialGrid::new(1.5).cell_size(), 3.0);
        assert_eq!(SpatialGrid::new(0.0).cell_size(), 1.0);
    }

    #[test]
    fn overlaps_is_strict() {
        let mut grid = SpatialGrid::new(1.0);
        grid.add(Vec2::ZERO);
        assert!(grid.overlaps(Vec2::new(0.5, 0.5), 1.0));
        assert!(!grid.overlaps(Vec2::new(1.0, 0.0), 1.0));
        assert!(!grid.overlaps(Vec2::new(0.8, 0.8), 1.0));
    }

    #[test]
    fn overlaps_crosses_cell_boundaries() {
        let mut grid = SpatialGrid::new(1.0);
        // Cell (0,0) and cell (-1,-1) are neighbors.
        grid.add(Vec2::new(0.1, 0.1));
        assert!(grid.overlaps(Vec2::new(-0.3, -0.3), 1.0));
        assert_eq!(grid.cell_of(Vec2::new(-0.3, -0.3)), IVec2::new(-1, -1));
    }

    #[test]
    fn len_counts_insertions() {
        let mut grid = SpatialGrid::new(0.5);
        grid.add(Vec2::new(3.0, 3.0));
        grid.add(Vec2::new(3.0, 3.0));
        assert_eq!(grid.len(), 2);
    }
}
