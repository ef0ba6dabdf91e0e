//! Count-targeted blue-noise sampling.
use glam::Vec2;
use rand::RngCore;
use tracing::warn;

use crate::finalize::PointFinalizer;
use crate::grid::SpatialGrid;
use crate::point::ScatterPoint;
use crate::sampling::frontier::{FrontierGrowth, FrontierSeed, GrowthLimits};
use crate::sampling::ScatterSampling;

/// Blue-noise frontier growth aiming for `count` points.
///
/// `cell_size` is the enforced separation; candidates are offered at twice
/// that distance. Without an explicit cell size it is derived from the zone
/// area so that roughly `count` points fit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlueNoiseSampling {
    /// Target number of points.
    pub count: usize,
    /// Separation distance; `None` derives it from zone area and `count`.
    pub cell_size: Option<f32>,
    /// Total candidate attempts before giving up.
    pub max_total_attempts: usize,
}

impl BlueNoiseSampling {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            cell_size: None,
            max_total_attempts: GrowthLimits::default().max_total_attempts,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    pub fn with_max_total_attempts(mut self, attempts: usize) -> Self {
        self.max_total_attempts = attempts;
        self
    }

    /// Separation used for a zone of the given area.
    pub fn resolved_cell_size(&self, area: f32) -> f32 {
        match self.cell_size {
            Some(c) => c,
            None if self.count > 0 && area > 0.0 => 0.45 * (area / self.count as f32).sqrt(),
            None => 0.0,
        }
    }

    /// Grows up to `count` points against a caller-owned grid.
    ///
    /// `seeds` are queued as frontier origins; pass existing points to grow
    /// into the gaps between them. The grid's cell size must cover the
    /// resolved cell size.
    pub fn generate_with_grid(
        &self,
        finalizer: &PointFinalizer<'_>,
        grid: &mut SpatialGrid,
        seeds: &[Vec2],
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        if self.count == 0 {
            return Vec::new();
        }
        let cell_size = self.resolved_cell_size(finalizer.zone().area());
        if !cell_size.is_finite() || cell_size <= 0.0 {
            warn!("Blue noise cell size must be > 0 (got {cell_size}).");
            return Vec::new();
        }

        let limits = GrowthLimits::default()
            .with_max_points(self.count)
            .with_max_total_attempts(self.max_total_attempts);
        FrontierGrowth::new(cell_size, cell_size * 2.0)
            .with_limits(limits)
            .grow(finalizer, grid, seeds, rng)
    }
}

impl ScatterSampling for BlueNoiseSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        if self.count == 0 || finalizer.zone().is_degenerate() {
            return Vec::new();
        }
        let cell_size = self.resolved_cell_size(finalizer.zone().area());
        let mut grid = SpatialGrid::new(cell_size);
        let seed = FrontierSeed::Random.position(finalizer, rng);
        self.generate_with_grid(finalizer, &mut grid, &[seed], rng)
    }
}
