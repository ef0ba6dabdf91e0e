//! Poisson disk sampling strategy (Bridson-style frontier growth).
use rand::RngCore;
use tracing::warn;

use crate::finalize::PointFinalizer;
use crate::grid::SpatialGrid;
use crate::point::ScatterPoint;
use crate::sampling::frontier::{FrontierGrowth, FrontierSeed, GrowthLimits};
use crate::sampling::ScatterSampling;

/// Poisson disk sampling: no two accepted points closer than `min_distance`.
///
/// Candidates are offered at `min_distance × (1 + relaxation)` from their
/// frontier point. Separation is always enforced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples in world units.
    pub min_distance: f32,
    /// Extra step beyond `min_distance` for candidate offsets.
    pub relaxation: f32,
    /// Where growth starts.
    pub seed: FrontierSeed,
    pub limits: GrowthLimits,
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with specified minimum distance.
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            relaxation: 0.2,
            seed: FrontierSeed::ZoneCenter,
            limits: GrowthLimits::default(),
        }
    }

    pub fn with_relaxation(mut self, relaxation: f32) -> Self {
        self.relaxation = relaxation;
        self
    }

    pub fn with_seed(mut self, seed: FrontierSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_limits(mut self, limits: GrowthLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Caps the number of accepted points.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.limits.max_points = Some(max_points);
        self
    }

    fn step_radius(&self) -> f32 {
        self.min_distance * (1.0 + self.relaxation.max(0.0))
    }
}

impl ScatterSampling for PoissonDiskSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            warn!(
                "Poisson disk min_distance must be > 0 (got {}).",
                self.min_distance
            );
            return Vec::new();
        }

        let seed = self.seed.position(finalizer, rng);
        let mut grid = SpatialGrid::new(self.min_distance);
        FrontierGrowth::new(self.min_distance, self.step_radius())
            .with_limits(self.limits)
            .grow(finalizer, &mut grid, &[seed], rng)
    }
}
