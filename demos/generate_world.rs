//! Example: Generate an island world
//!
//! Builds a world, prints its islands and terrain mix, and the render mesh.
//! Run with `RUST_LOG=debug` to see each generation phase.

use std::collections::BTreeMap;

use geodesic_isles::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Geodesic Island World Example");
    println!("=============================\n");

    let config = WorldConfigBuilder::new()
        .seed(42)
        .subdivisions(4)?
        .island_count(10)?
        .island_size(40)
        .build()?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Subdivisions: {}", config.subdivisions);
    println!("  Tiles: {}", config.tile_count());
    println!("  Vertices: {}", config.vertex_count());
    println!("  Radius: {}", config.radius);
    println!();

    let world = World::generate(config)?;

    let report = world.report();
    println!("Islands:");
    println!(
        "  requested {}, placed {}, rejected {}, kept {}",
        report.requested, report.placed, report.rejected, report.kept
    );
    for (id, island) in world.islands().iter().enumerate() {
        let root = world.graph().try_tile(island.root)?;
        println!(
            "  #{}: root tile {} ({}), {} tiles, {} land",
            id,
            island.root,
            root.terrain.name(),
            island.tiles,
            island.land
        );
    }

    println!("\nTerrain distribution:");
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tile in world.graph().tiles() {
        *counts.entry(tile.terrain.name()).or_insert(0) += 1;
    }
    for (name, count) in counts {
        let pct = count as f32 / world.tile_count() as f32 * 100.0;
        println!("  {}: {} ({:.1}%)", name, count, pct);
    }

    #[cfg(feature = "spatial-index")]
    {
        let probe = Vec3::new(0.0, world.radius(), 0.0);
        let tile = world.graph().find_tile_at(probe);
        println!("\nNorth pole is tile {}", tile);
    }

    let mesh = generate_mesh(&world, &BasicColorMapper);
    println!("\nMesh:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());

    Ok(())
}
