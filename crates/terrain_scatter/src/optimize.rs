//! Post-generation optimizer: de-overlap, then gap-fill toward a target density.
use glam::Vec2;
use rand::RngCore;
use tracing::{debug, warn};

use crate::finalize::PointFinalizer;
use crate::grid::SpatialGrid;
use crate::point::ScatterPoint;
use crate::sampling::blue_noise::BlueNoiseSampling;

/// Density normalization over an existing point set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optimizer {
    /// Minimum horizontal separation kept between points.
    pub min_distance: f32,
    /// Target points per unit area; `None` skips gap-filling.
    pub target_density: Option<f32>,
    /// Attempt cap for the gap-filling growth.
    pub max_total_attempts: usize,
}

/// Points after optimization plus what changed.
#[derive(Debug, Clone, Default)]
pub struct Optimized {
    pub points: Vec<ScatterPoint>,
    pub overlaps_removed: usize,
    pub gaps_filled: usize,
}

impl Optimizer {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            target_density: None,
            max_total_attempts: 100_000,
        }
    }

    pub fn with_target_density(mut self, density: f32) -> Self {
        self.target_density = Some(density);
        self
    }

    pub fn with_max_total_attempts(mut self, attempts: usize) -> Self {
        self.max_total_attempts = attempts;
        self
    }

    /// Runs de-overlap followed by gap-fill.
    pub fn optimize(
        &self,
        points: Vec<ScatterPoint>,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Optimized {
        let before = points.len();
        let kept = self.remove_overlaps(points);
        let overlaps_removed = before - kept.len();
        let kept_len = kept.len();
        let points = self.fill_gaps(kept, finalizer, rng);
        let gaps_filled = points.len() - kept_len;
        debug!(
            "Optimizer removed {overlaps_removed} overlapping points and filled {gaps_filled} gaps."
        );
        Optimized {
            points,
            overlaps_removed,
            gaps_filled,
        }
    }

    /// Keeps points greedily by descending density weight, dropping any point
    /// closer than `min_distance` to one already kept.
    pub fn remove_overlaps(&self, mut points: Vec<ScatterPoint>) -> Vec<ScatterPoint> {
        points.sort_by(|a, b| b.density.total_cmp(&a.density));
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return points;
        }

        let mut grid = SpatialGrid::new(self.min_distance);
        let mut kept = Vec::with_capacity(points.len());
        for p in points {
            if grid.overlaps(p.xz(), self.min_distance) {
                continue;
            }
            grid.add_point(&p);
            kept.push(p);
        }
        kept
    }

    /// Adds blue-noise points until the areal density reaches the target or
    /// candidates run out. Never adds more than the shortfall.
    pub fn fill_gaps(
        &self,
        mut points: Vec<ScatterPoint>,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let Some(target_density) = self.target_density else {
            return points;
        };
        let zone = finalizer.zone();
        let area = zone.area();
        if zone.is_degenerate() || !target_density.is_finite() || target_density <= 0.0 {
            return points;
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            warn!("Gap filling needs min_distance > 0 (got {}).", self.min_distance);
            return points;
        }

        let target_count = (target_density * area).round() as usize;
        let shortfall = target_count.saturating_sub(points.len());
        if shortfall == 0 {
            return points;
        }

        let mut grid = SpatialGrid::from_points(self.min_distance, &points);
        let mut seeds: Vec<Vec2> = points.iter().map(ScatterPoint::xz).collect();
        seeds.push(zone.random_point(rng));

        let candidates = BlueNoiseSampling::new(shortfall * 2)
            .with_cell_size(self.min_distance)
            .with_max_total_attempts(self.max_total_attempts)
            .generate_with_grid(finalizer, &mut grid, &seeds, rng);

        debug!(
            "Gap fill: density {:.4} < {:.4}, shortfall {shortfall}, {} candidates.",
            points.len() as f32 / area,
            target_density,
            candidates.len()
        );
        points.extend(candidates.into_iter().take(shortfall));
        points
    }
}
