//! Candidate samplers that produce finalized points over a zone.
//!
//! Each strategy proposes horizontal positions, runs them through the
//! [`PointFinalizer`] (terrain probe, zone constraints, scale/rotation/density)
//! and returns the accepted [`ScatterPoint`]s.
use rand::RngCore;

use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;

pub mod blue_noise;
pub mod clustered;
pub mod dla;
pub mod frontier;
pub mod noise_threshold;
pub mod poisson_disk;
pub mod wang;

pub use blue_noise::BlueNoiseSampling;
pub use clustered::{Cluster, ClusterPattern, ClusteredSampling, ClusteredScatter};
pub use dla::DlaSampling;
pub use frontier::{FrontierGrowth, FrontierSeed, GrowthLimits};
pub use noise_threshold::NoiseThresholdSampling;
pub use poisson_disk::PoissonDiskSampling;
pub use wang::{EdgeConstraint, TileGrid, TileSet, WangTile, WangTileSampling};

/// Trait for point sampling strategies.
pub trait ScatterSampling: Send + Sync {
    fn generate(&self, finalizer: &PointFinalizer<'_>, rng: &mut dyn RngCore)
        -> Vec<ScatterPoint>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform random angle in radians.
#[inline]
pub(crate) fn random_angle(rng: &mut dyn RngCore) -> f32 {
    rand01(rng) * std::f32::consts::TAU
}

/// Derives an independent seed for a worker column from a base seed.
pub fn seed_for_column(base_seed: u64, column: u32) -> u64 {
    let mixed = base_seed ^ (column as u64).wrapping_mul(0x9E3779B97F4A7C15);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
