use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::analysis::analyze_positions;
use terrain_scatter::prelude::*;

fn pairwise_min_distance(points: &[ScatterPoint]) -> f32 {
    let mut min = f32::MAX;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            min = min.min(a.horizontal_distance(b));
        }
    }
    min
}

fn flat_point(x: f32, z: f32) -> ScatterPoint {
    ScatterPoint {
        position: Vec3::new(x, 0.0, z),
        rotation: 0.0,
        orientation: glam::Quat::IDENTITY,
        scale: 1.0,
        density: 1.0,
        slope: 0.0,
        normal: Vec3::Y,
    }
}

fn all_methods() -> Vec<ScatterMethod> {
    vec![
        PoissonDiskSampling::new(1.0).into(),
        BlueNoiseSampling::new(40).into(),
        DlaSampling::new(60).with_max_walk_steps(2_000).into(),
        WangTileSampling::new(TileSet::reference())
            .with_tile_size(2.5)
            .into(),
        NoiseThresholdSampling::new(0.5, 0.5).with_workers(3).into(),
        ClusteredSampling::new(4, 12, 1.5).into(),
    ]
}

#[test]
fn poisson_disk_in_ten_by_ten_zone_respects_packing_bound() {
    let zone = ScatterZone::new(Vec3::ZERO, 10.0, 10.0);
    let settings = ScatterSettings::default();
    let mut rng = StdRng::seed_from_u64(2024);

    let result = run_scatter(
        &ScatterRequest::new(PoissonDiskSampling::new(1.0)),
        &zone,
        &settings,
        &NoTerrain,
        &mut rng,
        None,
    );

    // area / (π (d/2)²) ≈ 127.3
    let bound = (100.0 / (std::f32::consts::PI * 0.25)).floor() as usize;
    assert!(result.len() > 20, "only {} points", result.len());
    assert!(result.len() <= bound, "{} points", result.len());
    assert!(pairwise_min_distance(&result.points) >= 1.0 - 1e-5);
}

#[test]
fn clustered_points_stay_in_their_sub_zones() {
    let zone = ScatterZone::new(Vec3::ZERO, 20.0, 20.0);
    let settings = ScatterSettings::default();
    let finalizer = PointFinalizer::new(&zone, &settings, &NoTerrain);
    let mut rng = StdRng::seed_from_u64(5);

    let scatter = ClusteredSampling::new(5, 10, 2.0).compose(&finalizer, &mut rng);
    assert!(scatter.clusters.len() <= 5);
    assert!(scatter.len() <= 50);
    assert!(!scatter.is_empty());
    for cluster in &scatter.clusters {
        assert!(cluster.points.len() <= 10);
        for p in &cluster.points {
            assert!(cluster.zone.contains_xz(p.xz()), "{:?} outside cluster", p.xz());
            assert!(zone.contains_xz(p.xz()));
        }
    }
}

#[test]
fn gap_fill_moves_toward_target_without_new_overlaps() {
    let zone = ScatterZone::new(Vec3::ZERO, 10.0, 10.0);
    let settings = ScatterSettings::default();
    let finalizer = PointFinalizer::new(&zone, &settings, &NoTerrain);
    let mut rng = StdRng::seed_from_u64(77);

    let existing = vec![
        flat_point(-3.0, -3.0),
        flat_point(0.0, 2.0),
        flat_point(3.5, -1.0),
    ];
    let min_distance = 1.0;
    let optimizer = Optimizer::new(min_distance).with_target_density(0.2);
    let filled = optimizer.fill_gaps(existing.clone(), &finalizer, &mut rng);

    assert!(filled.len() > existing.len());
    assert!(filled.len() <= 20);
    assert!(pairwise_min_distance(&filled) >= min_distance - 1e-5);
    for original in &existing {
        assert!(filled.contains(original));
    }
}

#[test]
fn de_overlap_enforces_min_separation() {
    let zone = ScatterZone::new(Vec3::ZERO, 12.0, 12.0);
    let settings = ScatterSettings::default();
    let finalizer = PointFinalizer::new(&zone, &settings, &NoTerrain);
    let mut rng = StdRng::seed_from_u64(3);

    let dense = NoiseThresholdSampling::new(0.25, 0.4).generate(&finalizer, &mut rng);
    assert!(pairwise_min_distance(&dense) < 1.0);

    let kept = Optimizer::new(1.0).remove_overlaps(dense.clone());
    assert!(!kept.is_empty());
    assert!(kept.len() < dense.len());
    assert!(pairwise_min_distance(&kept) >= 1.0 - 1e-5);
}

#[test]
fn every_method_keeps_points_inside_zone_and_height_range() {
    let zone = ScatterZone::new(Vec3::new(5.0, 0.0, -5.0), 12.0, 12.0).with_height_range(-0.6, 0.6);
    let settings = ScatterSettings::default();
    let terrain = HeightFieldTerrain::new(|x: f32, z: f32| (x * 0.7).sin() * (z * 0.5).cos());

    for (i, method) in all_methods().into_iter().enumerate() {
        let name = method.name();
        let mut rng = StdRng::seed_from_u64(100 + i as u64);
        let result = run_scatter(
            &ScatterRequest::new(method),
            &zone,
            &settings,
            &terrain,
            &mut rng,
            None,
        );
        for p in &result.points {
            assert!(zone.contains_xz(p.xz()), "{name}: {:?} outside zone", p.xz());
            assert!(
                zone.height_in_range(p.position.y),
                "{name}: y {} outside height range",
                p.position.y
            );
            let expected = terrain.height_at(p.position.x, p.position.z);
            assert!((p.position.y - expected).abs() < 1e-4, "{name}: not on terrain");
        }
    }
}

#[test]
fn empty_requests_return_empty_results() {
    let zone = ScatterZone::new(Vec3::ZERO, 10.0, 10.0);
    let settings = ScatterSettings::default();
    let finalizer = PointFinalizer::new(&zone, &settings, &NoTerrain);
    let mut rng = StdRng::seed_from_u64(0);

    assert!(BlueNoiseSampling::new(0).generate(&finalizer, &mut rng).is_empty());
    assert!(DlaSampling::new(0).generate(&finalizer, &mut rng).is_empty());
    assert!(PoissonDiskSampling::new(1.0)
        .with_max_points(0)
        .generate(&finalizer, &mut rng)
        .is_empty());
    assert!(ClusteredSampling::new(0, 10, 1.0)
        .generate(&finalizer, &mut rng)
        .is_empty());
    assert!(NoiseThresholdSampling::new(0.5, 1.5)
        .generate(&finalizer, &mut rng)
        .is_empty());

    let flat = ScatterZone::new(Vec3::ZERO, 0.0, 0.0);
    for method in all_methods() {
        let name = method.name();
        let result = run_scatter(
            &ScatterRequest::new(method),
            &flat,
            &settings,
            &NoTerrain,
            &mut rng,
            None,
        );
        assert!(result.is_empty(), "{name} placed points in a zero-area zone");
    }
}

#[test]
fn wang_synthesis_matches_shared_edges() {
    let sampler = WangTileSampling::new(TileSet::reference());
    let mut rng = StdRng::seed_from_u64(11);
    let grid = sampler.synthesize_tiles(8, 6, &mut rng);
    assert!(grid.is_complete());

    let tiles = sampler.tile_set.tiles();
    for row in 0..grid.rows {
        for column in 0..grid.columns {
            let Some(here) = grid.get(column, row) else {
                panic!("empty cell ({column}, {row})");
            };
            if row > 0 {
                let above = grid.get(column, row - 1).unwrap();
                assert_eq!(tiles[here].north, tiles[above].south);
            }
            if column > 0 {
                let left = grid.get(column - 1, row).unwrap();
                assert_eq!(tiles[here].west, tiles[left].east);
            }
        }
    }
}

#[test]
fn clustering_index_orders_grid_below_cluster() {
    let grid: Vec<Vec2> = (0..5)
        .flat_map(|i| (0..5).map(move |j| Vec2::new(i as f32 * 2.0, j as f32 * 2.0)))
        .collect();

    // 25 points within radius 0.5 of one center, denser toward the middle.
    let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    let cluster: Vec<Vec2> = (0..25)
        .map(|i| {
            let r = 0.5 * i as f32 / 24.0;
            let a = i as f32 * golden;
            Vec2::new(3.0 + r * a.cos(), 3.0 + r * a.sin())
        })
        .collect();

    let grid_index = analyze_positions(&grid).index;
    let cluster_index = analyze_positions(&cluster).index;
    assert!(grid_index < 1.0, "grid index {grid_index}");
    assert!(cluster_index > 1.0, "cluster index {cluster_index}");
    assert!(cluster_index > grid_index);
}

#[test]
fn same_seed_reproduces_every_method() {
    let zone = ScatterZone::new(Vec3::ZERO, 10.0, 10.0);
    let settings = ScatterSettings::default();
    for method in all_methods() {
        let request = ScatterRequest::new(method);
        let a = run_scatter(
            &request,
            &zone,
            &settings,
            &NoTerrain,
            &mut StdRng::seed_from_u64(9),
            None,
        );
        let b = run_scatter(
            &request,
            &zone,
            &settings,
            &NoTerrain,
            &mut StdRng::seed_from_u64(9),
            None,
        );
        assert_eq!(a.points, b.points, "{} is not reproducible", request.method.name());
    }
}

#[test]
fn background_job_delivers_whole_result() {
    let job = ScatterJob::new(
        ScatterZone::new(Vec3::ZERO, 16.0, 16.0),
        ScatterSettings::default(),
        Arc::new(FlatTerrain::new(1.0)),
        ScatterRequest::new(DlaSampling::new(40).with_max_walk_steps(2_000))
            .with_optimizer(Optimizer::new(0.5)),
        31,
    );
    let expected = job.run();
    let result = job.spawn().unwrap().wait().unwrap();
    assert_eq!(result.points, expected.points);
    assert_eq!(result.generated, expected.generated);
    assert!(result.points.iter().all(|p| (p.position.y - 1.0).abs() < 1e-4));
}
