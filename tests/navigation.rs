//! Ship routing across generated worlds

use geodesic_isles::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn world(seed: u32) -> World {
    let config = WorldConfigBuilder::new()
        .seed(seed)
        .subdivisions(4)
        .unwrap()
        .build()
        .unwrap();
    World::generate(config).unwrap()
}

/// Open sea everywhere, for scenarios that need full control over blocking
fn ocean() -> TileGraph {
    TileGraph::from_mesh(&SphereMesh::generate(3, 100.0).unwrap())
}

fn roomy_limits() -> SearchLimits {
    SearchLimits {
        max_path_len: 64,
        search_breadth: 1024,
    }
}

#[test]
fn test_found_paths_are_sound() {
    init_logger();
    let world = world(42);
    let graph = world.graph();
    let limits = SearchLimits::default();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), limits);
    let mut rng = WorldRng::new(5);
    let open = |_: usize| true;

    let mut found = 0;
    for _ in 0..50 {
        let start = graph.random_open_tile(&mut rng, &open).unwrap();
        let target = graph.random_open_tile(&mut rng, &open).unwrap();

        let Some(path) = pathfinder
            .find_path(graph, start, target, &open)
            .unwrap()
            .into_path()
        else {
            continue;
        };
        found += 1;

        assert!(path.len() <= limits.max_path_len);
        let tiles = path.walk(graph, start).unwrap();
        let mut previous = start;
        for &tile in &tiles {
            assert!(graph.tile(tile).unwrap().is_water());
            assert!(graph.tile(previous).unwrap().is_neighbor_of(tile));
            previous = tile;
        }
        assert_eq!(path.end_tile(graph, start).unwrap(), target);
    }
    assert!(found > 0);
}

#[test]
fn test_closed_target_ends_alongside() {
    init_logger();
    let world = world(42);
    let graph = world.graph();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), roomy_limits());
    let open = |_: usize| true;

    // A land tile on the coast
    let coast = graph
        .tiles()
        .iter()
        .find(|t| t.is_land() && t.neighbors.iter().any(|&n| graph.tiles()[n].is_water()))
        .unwrap()
        .id;
    let start = graph
        .tiles_within_hops(coast, 6)
        .into_iter()
        .rev()
        .find(|&t| graph.tiles()[t].is_water())
        .unwrap();

    let path = pathfinder
        .find_path(graph, start, coast, &open)
        .unwrap()
        .into_path()
        .unwrap();
    let end = path.end_tile(graph, start).unwrap();
    assert!(graph.tile(end).unwrap().is_water());
    assert!(graph.tile(end).unwrap().is_neighbor_of(coast));
}

#[test]
fn test_wire_path_replays_identically() {
    let graph = ocean();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), roomy_limits());
    let open = |_: usize| true;

    let path = pathfinder
        .find_path(&graph, 0, 200, &open)
        .unwrap()
        .into_path()
        .unwrap();
    let bytes = path.encode();
    assert_eq!(bytes.last(), Some(&0));

    let received = Path::decode(&bytes, 64).unwrap();
    assert_eq!(received, path);
    assert_eq!(received.walk(&graph, 0).unwrap(), path.walk(&graph, 0).unwrap());
}

#[test]
fn test_cut_off_target_falls_back() {
    init_logger();
    let graph = ocean();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), roomy_limits());
    let target = graph.tiles_within_hops(0, 100).last().copied().unwrap();

    let mut route = Route::new(0);
    let open = |_: usize| true;
    assert_eq!(
        route.replan(&graph, &mut pathfinder, target, &open).unwrap(),
        RouteOutcome::Planned
    );
    let old_tiles = route.path.walk(&graph, 0).unwrap();

    // Wall the target in
    let mut walled = vec![target];
    walled.extend_from_slice(graph.neighbors(target));
    let blocked = |t: usize| !walled.contains(&t);

    let outcome = route.replan(&graph, &mut pathfinder, target, &blocked).unwrap();
    let RouteOutcome::Fallback { toward } = outcome else {
        panic!("expected a fallback, got {:?}", outcome);
    };

    assert!(old_tiles.contains(&toward));
    assert!(!walled.contains(&toward));
    assert_eq!(route.target, toward);
    assert_eq!(route.path.end_tile(&graph, 0).unwrap(), toward);
}

#[test]
fn test_boxed_in_ship_is_stranded() {
    init_logger();
    let graph = ocean();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), roomy_limits());
    let mut route = Route::new(0);
    let open = |_: usize| true;
    route.replan(&graph, &mut pathfinder, 120, &open).unwrap();

    let around: Vec<usize> = graph.neighbors(0).to_vec();
    let boxed = |t: usize| !around.contains(&t);

    assert_eq!(
        route.replan(&graph, &mut pathfinder, 120, &boxed).unwrap(),
        RouteOutcome::Stranded
    );
    assert!(route.path.is_empty());
    assert_eq!(route.target, 0);
}

#[test]
fn test_search_limits_keep_previous_route() {
    init_logger();
    let graph = ocean();
    let open = |_: usize| true;
    let far = graph.tiles_within_hops(0, 100).last().copied().unwrap();

    let mut roomy = Pathfinder::new(graph.tile_count(), roomy_limits());
    let mut route = Route::new(0);
    route.replan(&graph, &mut roomy, 40, &open).unwrap();
    let before = route.clone();

    let mut cramped = Pathfinder::new(
        graph.tile_count(),
        SearchLimits {
            max_path_len: 64,
            search_breadth: 2,
        },
    );
    assert_eq!(
        route.replan(&graph, &mut cramped, far, &open).unwrap(),
        RouteOutcome::Kept
    );
    assert_eq!(route, before);

    let mut short = Pathfinder::new(
        graph.tile_count(),
        SearchLimits {
            max_path_len: 2,
            search_breadth: 1024,
        },
    );
    assert_eq!(
        route.replan(&graph, &mut short, far, &open).unwrap(),
        RouteOutcome::Kept
    );
    assert_eq!(route, before);
}

#[test]
fn test_fleet_never_shares_a_tile() {
    init_logger();
    let world = world(2024);
    let graph = world.graph();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::new(48));
    let mut occupancy = TileOccupancy::new(graph.tile_count());
    let mut rng = WorldRng::new(11);

    let mut fleet = Vec::new();
    for id in 0..8 {
        let tile = graph.random_open_tile(&mut rng, &occupancy).unwrap();
        assert!(occupancy.place(id, tile).unwrap());
        fleet.push((id, Route::new(tile)));
    }

    for _ in 0..60 {
        for (id, route) in &mut fleet {
            occupancy.finish_move(*id);
            if route.path.is_empty() {
                let goal = graph.random_open_tile(&mut rng, &occupancy).unwrap();
                route
                    .replan(graph, &mut pathfinder, goal, &occupancy.view(*id))
                    .unwrap();
            }
            if let StepOutcome::Moved(tile) = route.step(graph, &occupancy.view(*id)) {
                assert!(occupancy.begin_move(*id, tile).unwrap());
            }
        }

        for (id, route) in &fleet {
            assert!(graph.tile(route.tile).unwrap().is_water());
            assert_eq!(occupancy.occupant(route.tile), Some(*id));
            assert_eq!(occupancy.tile_of(*id), Some(route.tile));
        }
    }
}

#[test]
fn test_out_of_range_tiles_are_errors() {
    let graph = ocean();
    let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
    let open = |_: usize| true;

    assert!(pathfinder.find_path(&graph, 0, 256, &open).is_err());
    assert!(pathfinder.find_path(&graph, 256, 0, &open).is_err());
    assert!(Route::new(0)
        .replan(&graph, &mut pathfinder, 999, &open)
        .is_err());
}
