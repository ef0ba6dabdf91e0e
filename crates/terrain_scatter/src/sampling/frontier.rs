//! Frontier (active-queue) growth shared by the Poisson-disk and blue-noise samplers.
use std::collections::VecDeque;

use glam::Vec2;
use rand::RngCore;
use tracing::{debug, warn};

use crate::finalize::PointFinalizer;
use crate::grid::SpatialGrid;
use crate::point::ScatterPoint;
use crate::sampling::random_angle;

/// Candidate offsets tried around each dequeued frontier point.
pub const DEFAULT_ATTEMPTS_PER_POINT: usize = 30;

/// Caps that keep frontier growth bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthLimits {
    /// Stop once this many points were accepted (`None` = grow to saturation).
    pub max_points: Option<usize>,
    /// Stop after this many candidate offsets were tried in total.
    pub max_total_attempts: usize,
}

impl Default for GrowthLimits {
    fn default() -> Self {
        Self {
            max_points: None,
            max_total_attempts: 1_000_000,
        }
    }
}

impl GrowthLimits {
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }

    pub fn with_max_total_attempts(mut self, attempts: usize) -> Self {
        self.max_total_attempts = attempts;
        self
    }

    #[inline]
    fn reached(&self, accepted: usize) -> bool {
        self.max_points.is_some_and(|max| accepted >= max)
    }
}

/// Where the frontier queue starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrontierSeed {
    /// Start from the zone center.
    #[default]
    ZoneCenter,
    /// Start from a uniformly random zone point.
    Random,
}

impl FrontierSeed {
    pub(crate) fn position(self, finalizer: &PointFinalizer<'_>, rng: &mut dyn RngCore) -> Vec2 {
        match self {
            FrontierSeed::ZoneCenter => finalizer.zone().center_xz(),
            FrontierSeed::Random => finalizer.zone().random_point(rng),
        }
    }
}

/// Frontier growth: every accepted point is re-queued as a source of new
/// candidates at `step_radius` until the queue empties or a limit is hit.
#[derive(Debug, Clone)]
pub struct FrontierGrowth {
    /// Separation enforced against the grid.
    pub min_distance: f32,
    /// Distance of candidate offsets from their frontier point.
    pub step_radius: f32,
    /// Offsets tried per dequeued point.
    pub attempts_per_point: usize,
    pub limits: GrowthLimits,
}

impl FrontierGrowth {
    pub fn new(min_distance: f32, step_radius: f32) -> Self {
        Self {
            min_distance,
            step_radius,
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
            limits: GrowthLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: GrowthLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_attempts_per_point(mut self, attempts: usize) -> Self {
        self.attempts_per_point = attempts;
        self
    }

    /// Grows a point set from `seeds` against `grid`.
    ///
    /// Seeds are frontier origins: each is emitted only if it passes the same
    /// checks as any other candidate, but all of them are queued. Accepted
    /// points are inserted into `grid`, so the caller can pre-populate it with
    /// points that must not be overlapped.
    pub fn grow(
        &self,
        finalizer: &PointFinalizer<'_>,
        grid: &mut SpatialGrid,
        seeds: &[Vec2],
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let zone = finalizer.zone();
        if zone.is_degenerate() {
            warn!("Frontier growth on a zero-area zone; nothing to place.");
            return Vec::new();
        }
        if !self.step_radius.is_finite() || self.step_radius <= 0.0 {
            warn!(
                "Frontier step radius must be > 0 (got {}); nothing to place.",
                self.step_radius
            );
            return Vec::new();
        }
        if self.limits.reached(0) {
            return Vec::new();
        }
        debug_assert!(
            self.min_distance <= grid.cell_size(),
            "grid cell size must cover the separation distance"
        );

        let mut points = Vec::new();
        let mut queue: VecDeque<Vec2> = VecDeque::with_capacity(seeds.len());

        for &seed in seeds {
            if let Some(point) = self.try_accept(finalizer, grid, seed, rng) {
                points.push(point);
                if self.limits.reached(points.len()) {
                    return points;
                }
            }
            queue.push_back(seed);
        }

        let mut attempts = 0usize;
        'frontier: while let Some(origin) = queue.pop_front() {
            for _ in 0..self.attempts_per_point {
                if attempts >= self.limits.max_total_attempts {
                    debug!(
                        "Frontier growth hit the attempt cap ({}) with {} points.",
                        self.limits.max_total_attempts,
                        points.len()
                    );
                    break 'frontier;
                }
                attempts += 1;

                let angle = random_angle(rng);
                let candidate = origin + Vec2::new(angle.cos(), angle.sin()) * self.step_radius;
                if let Some(point) = self.try_accept(finalizer, grid, candidate, rng) {
                    points.push(point);
                    queue.push_back(candidate);
                    if self.limits.reached(points.len()) {
                        break 'frontier;
                    }
                }
            }
        }

        debug!(
            "Frontier growth accepted {} points after {} attempts.",
            points.len(),
            attempts
        );
        points
    }

    fn try_accept(
        &self,
        finalizer: &PointFinalizer<'_>,
        grid: &mut SpatialGrid,
        candidate: Vec2,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterPoint> {
        if !finalizer.zone().contains_xz(candidate) {
            return None;
        }
        let surface = finalizer.probe(candidate);
        if !finalizer.accepts(&surface) || grid.overlaps(candidate, self.min_distance) {
            return None;
        }
        grid.add(candidate);
        Some(finalizer.finalize(&surface, rng))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::settings::ScatterSettings;
    use crate::terrain::NoTerrain;
    use crate::zone::ScatterZone;

    #[test]
    fn grows_until_saturation_without_overlaps() {
        let zone = ScatterZone::default();
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = SpatialGrid::new(1.0);

        let growth = FrontierGrowth::new(1.0, 1.2);
        let pts = growth.grow(&f, &mut grid, &[Vec2::ZERO], &mut rng);

        assert!(pts.len() > 20);
        assert_eq!(grid.len(), pts.len());
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                assert!(a.horizontal_distance(b) >= 1.0 - 1e-5);
            }
        }
    }

    #[test]
    fn max_points_caps_output() {
        let zone = ScatterZone::default();
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = SpatialGrid::new(0.5);

        let growth = FrontierGrowth::new(0.5, 0.6)
            .with_limits(GrowthLimits::default().with_max_points(7));
        assert_eq!(growth.grow(&f, &mut grid, &[Vec2::ZERO], &mut rng).len(), 7);
    }

    #[test]
    fn zero_max_points_is_empty() {
        let zone = ScatterZone::default();
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = SpatialGrid::new(0.5);

        let growth =
            FrontierGrowth::new(0.5, 0.6).with_limits(GrowthLimits::default().with_max_points(0));
        assert!(growth.grow(&f, &mut grid, &[Vec2::ZERO], &mut rng).is_empty());
    }

    #[test]
    fn attempt_cap_bounds_work() {
        let zone = ScatterZone::default();
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = SpatialGrid::new(0.25);

        let growth = FrontierGrowth::new(0.25, 0.3)
            .with_limits(GrowthLimits::default().with_max_total_attempts(10));
        // Seed plus at most one point per attempt.
        assert!(growth.grow(&f, &mut grid, &[Vec2::ZERO], &mut rng).len() <= 11);
    }

    #[test]
    fn prepopulated_grid_blocks_candidates() {
        let zone = ScatterZone::new(Vec3::ZERO, 2.0, 2.0);
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(8);
        let mut grid = SpatialGrid::new(3.0);
        grid.add(Vec2::ZERO);

        // Every point of a 2x2 zone is within 3 units of the origin.
        let growth = FrontierGrowth::new(3.0, 1.0);
        assert!(growth.grow(&f, &mut grid, &[Vec2::ZERO], &mut rng).is_empty());
    }
}
