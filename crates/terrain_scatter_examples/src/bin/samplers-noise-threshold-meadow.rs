use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{render_points_to_png, PointStyle, RenderConfig};

fn hills(x: f32, z: f32) -> f32 {
    4.0 * (x * 0.08).sin() * (z * 0.06).cos()
}

fn main() -> anyhow::Result<()> {
    // Flowers only on the lower ground and gentle slopes.
    let zone = ScatterZone::new(Vec3::ZERO, 80.0, 80.0)
        .with_size(Vec3::new(80.0, 10.0, 80.0))
        .with_height_range(-4.0, 1.0)
        .with_slope_curve(ResponseCurve::from_keys([(0.0, 1.0), (0.2, 0.8), (0.3, 0.0)])?);
    let terrain = HeightFieldTerrain::new(hills);
    let settings = ScatterSettings::default().with_scale_range(0.5, 1.0);
    let engine = ScatterEngine::try_new(zone, settings, &terrain)?;
    let mut rng = StdRng::seed_from_u64(11);

    let request = ScatterRequest::new(
        NoiseThresholdSampling::new(0.6, 0.55)
            .with_frequency(0.08)
            .with_octaves(5),
    );
    let result = engine.run(&request, &mut rng);
    println!("Meadow: {} flowers", result.len());

    let config = RenderConfig::new((800, 800), &engine.zone)
        .with_background([120, 170, 90])
        .with_height_shading(hills, -4.0, 4.0);
    render_points_to_png(
        &result.points,
        PointStyle::new([250, 220, 60], 2),
        &config,
        "samplers-noise-threshold-meadow.png",
    )
}
