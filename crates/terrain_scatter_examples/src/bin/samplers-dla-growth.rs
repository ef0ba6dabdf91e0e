use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{event_printer, render_points_to_png, PointStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    let zone = ScatterZone::new(Vec3::ZERO, 60.0, 60.0);
    let settings = ScatterSettings::default().with_scale_range(0.6, 1.0);
    let engine = ScatterEngine::try_new(zone, settings, &NoTerrain)?;
    let mut rng = StdRng::seed_from_u64(7);

    let request = ScatterRequest::new(
        DlaSampling::new(600)
            .with_cell_size(0.75)
            .with_step_length(0.75),
    );
    let mut sink = event_printer();
    let result = engine.run_with_events(&request, &mut rng, &mut sink);

    println!(
        "DLA aggregate: {} particles stuck, clustering index {:.3}",
        result.len(),
        engine.analyze(&result.points).index
    );

    let config = RenderConfig::new((800, 800), &engine.zone).with_background([20, 22, 30]);
    render_points_to_png(
        &result.points,
        PointStyle::new([120, 200, 255], 3),
        &config,
        "samplers-dla-growth.png",
    )
}
