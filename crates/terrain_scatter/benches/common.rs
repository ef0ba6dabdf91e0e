use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec3;
use terrain_scatter::settings::ScatterSettings;
use terrain_scatter::zone::ScatterZone;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Square zone of edge `extent` centered on the origin.
#[allow(dead_code)]
pub fn square_zone(extent: f32) -> ScatterZone {
    ScatterZone::new(Vec3::ZERO, extent, extent)
}

/// Settings without normal alignment, so finalization cost stays flat.
#[allow(dead_code)]
pub fn bench_settings() -> ScatterSettings {
    ScatterSettings::default().with_align_to_normal(false)
}
