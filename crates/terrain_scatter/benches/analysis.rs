mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::analysis::analyze;
use terrain_scatter::finalize::PointFinalizer;
use terrain_scatter::sampling::{BlueNoiseSampling, ScatterSampling};
use terrain_scatter::terrain::FlatTerrain;

const POINT_COUNTS: [usize; 3] = [100, 400, 1600];

fn analysis_benches(c: &mut Criterion) {
    let zone = common::square_zone(200.0);
    let settings = common::bench_settings();
    let terrain = FlatTerrain::new(0.0);
    let finalizer = PointFinalizer::new(&zone, &settings, &terrain);

    let mut group = c.benchmark_group("analysis/ripley_index");
    for &count in &POINT_COUNTS {
        let mut rng = StdRng::seed_from_u64(0xA11CE ^ count as u64);
        let points = BlueNoiseSampling::new(count).generate(&finalizer, &mut rng);
        group.throughput(common::elements_throughput(points.len()));

        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, pts| {
            b.iter(|| black_box(analyze(pts).index));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = analysis_benches
}
criterion_main!(benches);
