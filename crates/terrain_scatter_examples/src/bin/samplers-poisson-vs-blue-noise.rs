use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{render_points_to_png, PointStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    let zone = ScatterZone::new(Vec3::ZERO, 100.0, 100.0);
    let engine = ScatterEngine::try_new(zone, ScatterSettings::default(), &NoTerrain)?;
    let mut rng = StdRng::seed_from_u64(42);

    // Poisson disk grows to saturation from the zone center.
    let poisson = engine.run(&ScatterRequest::new(PoissonDiskSampling::new(4.0)), &mut rng);

    // Blue noise stops at a requested count.
    let blue = engine.run(&ScatterRequest::new(BlueNoiseSampling::new(300)), &mut rng);

    for (name, result, color) in [
        ("poisson", &poisson, [34, 110, 60]),
        ("blue-noise", &blue, [40, 70, 160]),
    ] {
        let report = engine.analyze(&result.points);
        println!(
            "{name}: {} points, clustering index {:.3}",
            result.len(),
            report.index
        );
        let config = RenderConfig::new((800, 800), &engine.zone);
        render_points_to_png(
            &result.points,
            PointStyle::new(color, 4).scaled(),
            &config,
            format!("samplers-{name}.png"),
        )?;
    }
    Ok(())
}
