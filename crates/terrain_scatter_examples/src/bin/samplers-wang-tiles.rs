use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_scatter::prelude::*;
use terrain_scatter_examples::{render_points_to_png, PointStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    // Two tiles per (north, west) pair, so interior cells still vary.
    let tile_set = TileSet::two_color();

    let zone = ScatterZone::new(Vec3::ZERO, 80.0, 80.0);
    let terrain = FlatTerrain::new(0.0);
    let engine = ScatterEngine::try_new(zone, ScatterSettings::default(), &terrain)?;
    let mut rng = StdRng::seed_from_u64(3);

    let sampler = WangTileSampling::new(tile_set).with_tile_size(5.0);
    let n = sampler.grid_cells_per_side(engine.zone.extent());
    let grid = sampler.synthesize_tiles(n, n, &mut rng);
    println!("Synthesized {n}x{n} tiles, complete: {}", grid.is_complete());

    let result = engine.run(&ScatterRequest::new(sampler), &mut rng);
    println!("Seeded {} points from tiles", result.len());

    let config = RenderConfig::new((800, 800), &engine.zone).with_background([240, 236, 220]);
    render_points_to_png(
        &result.points,
        PointStyle::new([150, 90, 40], 3),
        &config,
        "samplers-wang-tiles.png",
    )
}
