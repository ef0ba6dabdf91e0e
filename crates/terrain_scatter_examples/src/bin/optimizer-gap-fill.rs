use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{
    event_printer, render_layers_to_png, PointLayer, PointStyle, RenderConfig,
};

fn main() -> anyhow::Result<()> {
    let zone = ScatterZone::new(Vec3::ZERO, 60.0, 60.0);
    let engine = ScatterEngine::try_new(zone, ScatterSettings::default(), &NoTerrain)?;
    let mut rng = StdRng::seed_from_u64(99);

    // Clusters overlap and leave gaps; the optimizer thins and refills them.
    let raw = engine.run(
        &ScatterRequest::new(ClusteredSampling::new(6, 30, 4.0)),
        &mut rng,
    );
    let request = ScatterRequest::new(ClusteredSampling::new(6, 30, 4.0))
        .with_optimizer(Optimizer::new(1.5).with_target_density(0.12));
    let mut sink = event_printer();
    let optimized = engine.run_with_events(&request, &mut StdRng::seed_from_u64(99), &mut sink);

    println!(
        "raw: {} points (index {:.3}); optimized: {} points (-{} overlaps, +{} gaps, index {:.3})",
        raw.len(),
        engine.analyze(&raw.points).index,
        optimized.len(),
        optimized.overlaps_removed,
        optimized.gaps_filled,
        engine.analyze(&optimized.points).index,
    );

    let config = RenderConfig::new((800, 800), &engine.zone);
    render_layers_to_png(
        &[PointLayer::new(&raw.points, PointStyle::new([200, 80, 80], 3))],
        &config,
        "optimizer-before.png",
    )?;
    render_layers_to_png(
        &[PointLayer::new(&optimized.points, PointStyle::new([60, 140, 80], 3))],
        &config,
        "optimizer-after.png",
    )
}
