//! Example: Sail a small fleet around an island world
//!
//! Places ships on random sea tiles and moves them tick by tick toward
//! random destinations, replanning whenever a route is blocked.
//! Run with `RUST_LOG=debug` to see fallback and stranding decisions.

use geodesic_isles::*;

const SHIPS: AgentId = 6;
const TICKS: usize = 40;

struct Ship {
    id: AgentId,
    route: Route,
    arrivals: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = WorldConfigBuilder::new()
        .seed(2024)
        .subdivisions(4)?
        .build()?;
    let world = World::generate(config)?;
    let graph = world.graph();

    println!(
        "World: {} tiles, {} islands",
        world.tile_count(),
        world.islands().len()
    );

    let mut rng = WorldRng::new(7);
    let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::new(48));
    let mut occupancy = TileOccupancy::new(graph.tile_count());

    let mut ships = Vec::new();
    for id in 0..SHIPS {
        let Some(tile) = graph.random_open_tile(&mut rng, &occupancy) else {
            break;
        };
        occupancy.place(id, tile)?;
        ships.push(Ship {
            id,
            route: Route::new(tile),
            arrivals: 0,
        });
    }

    for tick in 0..TICKS {
        for ship in &mut ships {
            occupancy.finish_move(ship.id);

            if ship.route.path.is_empty() {
                let Some(goal) = graph.random_open_tile(&mut rng, &occupancy) else {
                    continue;
                };
                let outcome =
                    ship.route
                        .replan(graph, &mut pathfinder, goal, &occupancy.view(ship.id))?;
                println!(
                    "[{:>2}] ship {} at {} -> {}: {:?} ({} steps)",
                    tick,
                    ship.id,
                    ship.route.tile,
                    goal,
                    outcome,
                    ship.route.path.len()
                );
            }

            match ship.route.step(graph, &occupancy.view(ship.id)) {
                StepOutcome::Moved(tile) => {
                    occupancy.begin_move(ship.id, tile)?;
                    if ship.route.path.is_empty() {
                        ship.arrivals += 1;
                    }
                }
                StepOutcome::Blocked => {
                    println!("[{:>2}] ship {} blocked at {}", tick, ship.id, ship.route.tile);
                }
                StepOutcome::Waiting | StepOutcome::Arrived => {}
            }
        }
    }

    println!();
    for ship in &ships {
        println!(
            "ship {}: on tile {}, {} arrivals",
            ship.id, ship.route.tile, ship.arrivals
        );
    }

    Ok(())
}
