//! Clustered composition: blue-noise cluster centers filled with parametric sub-patterns.
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rand::RngCore;
use tracing::{debug, warn};

use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;
use crate::sampling::blue_noise::BlueNoiseSampling;
use crate::sampling::{rand01, random_angle, ScatterSampling};
use crate::zone::ScatterZone;

/// Gaussian children use `sigma = radius × GAUSSIAN_SIGMA_FRACTION`.
pub const GAUSSIAN_SIGMA_FRACTION: f32 = 0.5;
/// Ring children lie in `radius × (1 ± RING_HALF_WIDTH)`.
pub const RING_HALF_WIDTH: f32 = 0.1;
/// Spiral turns: angle runs over `[0, SPIRAL_SWEEP)`.
pub const SPIRAL_SWEEP: f32 = 8.0 * PI;
/// Spiral jitter per axis, as a fraction of the settings' jitter strength.
pub const SPIRAL_JITTER_FRACTION: f32 = 0.2;

/// Sub-pattern used to fill one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterPattern {
    /// Box–Muller normal offsets, radial falloff.
    Gaussian,
    /// Thin annulus at the cluster radius.
    Ring,
    /// Archimedean spiral from the center outwards.
    Spiral,
}

impl ClusterPattern {
    pub const ALL: [ClusterPattern; 3] = [
        ClusterPattern::Gaussian,
        ClusterPattern::Ring,
        ClusterPattern::Spiral,
    ];

    fn random(rng: &mut dyn RngCore) -> Self {
        let i = ((rand01(rng) * 3.0) as usize).min(2);
        Self::ALL[i]
    }

    /// Horizontal offset of child `index` out of `count`.
    fn offset(
        self,
        index: usize,
        count: usize,
        radius: f32,
        jitter: f32,
        rng: &mut dyn RngCore,
    ) -> Vec2 {
        match self {
            ClusterPattern::Gaussian => {
                let (nx, nz) = box_muller_pair(rng);
                Vec2::new(nx, nz) * radius * GAUSSIAN_SIGMA_FRACTION
            }
            ClusterPattern::Ring => {
                let angle = random_angle(rng);
                let r = radius * (1.0 - RING_HALF_WIDTH + rand01(rng) * 2.0 * RING_HALF_WIDTH);
                Vec2::new(angle.cos(), angle.sin()) * r
            }
            ClusterPattern::Spiral => {
                let t = index as f32 / count.max(1) as f32;
                let angle = t * SPIRAL_SWEEP;
                let r = t * radius;
                let noise = Vec2::new(rand01(rng) - 0.5, rand01(rng) - 0.5)
                    * jitter
                    * SPIRAL_JITTER_FRACTION;
                Vec2::new(angle.cos(), angle.sin()) * r + noise
            }
        }
    }
}

/// One composed cluster.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Center as produced by the blue-noise pass.
    pub center: Vec3,
    /// Radius-derived sub-zone every child lies in.
    pub zone: ScatterZone,
    pub pattern: ClusterPattern,
    pub points: Vec<ScatterPoint>,
}

/// Output of [`ClusteredSampling::compose`], grouped by cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusteredScatter {
    pub clusters: Vec<Cluster>,
}

impl ClusteredScatter {
    /// Total number of points across clusters.
    pub fn len(&self) -> usize {
        self.clusters.iter().map(|c| c.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.clusters.iter().flat_map(|c| c.points.iter())
    }

    pub fn into_points(self) -> Vec<ScatterPoint> {
        self.clusters.into_iter().flat_map(|c| c.points).collect()
    }
}

/// Blue-noise cluster centers, each filled with a random sub-pattern.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusteredSampling {
    /// Number of cluster centers requested.
    pub cluster_count: usize,
    /// Children attempted per cluster.
    pub points_per_cluster: usize,
    /// Cluster radius in world units.
    pub cluster_radius: f32,
    /// Force one pattern for every cluster instead of picking per cluster.
    pub pattern: Option<ClusterPattern>,
}

impl ClusteredSampling {
    pub fn new(cluster_count: usize, points_per_cluster: usize, cluster_radius: f32) -> Self {
        Self {
            cluster_count,
            points_per_cluster,
            cluster_radius,
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: ClusterPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Places centers and fills every cluster, keeping the grouping.
    pub fn compose(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> ClusteredScatter {
        let zone = finalizer.zone();
        if self.cluster_count == 0 || self.points_per_cluster == 0 {
            return ClusteredScatter::default();
        }
        if !self.cluster_radius.is_finite() || self.cluster_radius <= 0.0 {
            warn!(
                "Cluster radius must be > 0 (got {}).",
                self.cluster_radius
            );
            return ClusteredScatter::default();
        }

        let centers = BlueNoiseSampling::new(self.cluster_count).generate(finalizer, rng);
        let jitter = finalizer.settings().jitter;

        let mut clusters = Vec::with_capacity(centers.len());
        for center in centers {
            let sub_zone = zone.sub_zone(
                Vec3::new(center.position.x, zone.center.y, center.position.z),
                self.cluster_radius,
            );
            let sub = finalizer.with_zone(&sub_zone);
            let pattern = self.pattern.unwrap_or_else(|| ClusterPattern::random(rng));

            let mut points = Vec::with_capacity(self.points_per_cluster);
            for i in 0..self.points_per_cluster {
                let offset = pattern.offset(
                    i,
                    self.points_per_cluster,
                    self.cluster_radius,
                    jitter,
                    rng,
                );
                let position = center.xz() + offset;
                if !zone.contains_xz(position) {
                    continue;
                }
                if let Some(point) = sub.try_place(position, rng) {
                    points.push(point);
                }
            }

            clusters.push(Cluster {
                center: center.position,
                zone: sub_zone,
                pattern,
                points,
            });
        }

        let result = ClusteredScatter { clusters };
        debug!(
            "Composed {} clusters with {} points.",
            result.clusters.len(),
            result.len()
        );
        result
    }
}

impl ScatterSampling for ClusteredSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        self.compose(finalizer, rng).into_points()
    }
}

fn box_muller_pair(rng: &mut dyn RngCore) -> (f32, f32) {
    let u1 = (1.0 - rand01(rng)).clamp(f32::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = TAU * u2;

    (r * theta.cos(), r * theta.sin())
}
