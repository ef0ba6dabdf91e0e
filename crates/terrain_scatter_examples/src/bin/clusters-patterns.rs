use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{render_layers_to_png, PointLayer, PointStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    let zone = ScatterZone::new(Vec3::ZERO, 100.0, 100.0);
    let settings = ScatterSettings::default();
    let finalizer = PointFinalizer::new(&zone, &settings, &NoTerrain);
    let mut rng = StdRng::seed_from_u64(21);

    let scatter = ClusteredSampling::new(12, 40, 6.0).compose(&finalizer, &mut rng);

    let mut by_pattern: [Vec<ScatterPoint>; 3] = Default::default();
    for cluster in &scatter.clusters {
        let slot = match cluster.pattern {
            ClusterPattern::Gaussian => 0,
            ClusterPattern::Ring => 1,
            ClusterPattern::Spiral => 2,
        };
        by_pattern[slot].extend_from_slice(&cluster.points);
        println!(
            "{:?} cluster at ({:.1}, {:.1}): {} points",
            cluster.pattern,
            cluster.center.x,
            cluster.center.z,
            cluster.points.len()
        );
    }

    let all = scatter.into_points();
    println!("Clustering index: {:.3}", clustering_index(&all));

    let layers = [
        PointLayer::new(&by_pattern[0], PointStyle::new([200, 60, 60], 3)),
        PointLayer::new(&by_pattern[1], PointStyle::new([60, 160, 60], 3)),
        PointLayer::new(&by_pattern[2], PointStyle::new([60, 90, 200], 3)),
    ];
    let config = RenderConfig::new((800, 800), &zone);
    render_layers_to_png(&layers, &config, "clusters-patterns.png")
}
