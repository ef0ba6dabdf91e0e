use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec3;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{render_points_to_png, PointStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    let zone = ScatterZone::new(Vec3::ZERO, 200.0, 200.0)
        .with_size(Vec3::new(200.0, 20.0, 200.0));
    let terrain = Arc::new(HeightFieldTerrain::new(|x: f32, z: f32| {
        6.0 * (x * 0.03).sin() + 4.0 * (z * 0.05).cos()
    }));

    let job = ScatterJob::new(
        zone.clone(),
        ScatterSettings::default(),
        terrain,
        ScatterRequest::new(PoissonDiskSampling::new(2.0)),
        1234,
    );

    let (mut task, events) = job.spawn_with_events()?;
    let mut ticks = 0;
    let result = loop {
        for event in events.try_iter() {
            println!("event: {:?}", event.kind());
        }
        if let Some(result) = task.try_take() {
            break result;
        }
        if task.is_finished() {
            break task.wait()?;
        }
        ticks += 1;
        thread::sleep(Duration::from_millis(5));
    };

    println!(
        "Background job finished after ~{} polls with {} points",
        ticks,
        result.len()
    );
    let config = RenderConfig::new((800, 800), &zone);
    render_points_to_png(
        &result.points,
        PointStyle::new([40, 90, 40], 2),
        &config,
        "jobs-background.png",
    )
}
