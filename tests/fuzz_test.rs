/// Fuzzes the search strategies on many random grids: every strategy must find the goal exactly
/// when it is on the same connected component as the start, and A* must agree with BFS on the
/// shortest path length under both connectivities.
use grid_search_stepper::{
    Pathfinder, PathingGrid, SearchState, SearchStatus, StepOutcome, Strategy,
};
use grid_util::point::Point;
use rand::prelude::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng, diagonal: bool, density: f64) -> PathingGrid {
    let mut pathing_grid = PathingGrid::new(w, h).unwrap();
    pathing_grid.set_allow_diagonal_move(diagonal);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            if rng.gen_bool(density) {
                pathing_grid.place_wall(Point::new(x, y)).unwrap();
            }
        }
    }
    pathing_grid.generate_components();
    pathing_grid
}

fn visualize_grid(grid: &PathingGrid) {
    println!("{}", grid);
}

/// Runs a search to completion, checking the step accounting along the way.
fn run(strategy: Strategy, grid: &mut PathingGrid) -> (SearchState, Option<usize>) {
    let mut state = SearchState::new(strategy, grid);
    let mut calls = 0;
    let outcome = loop {
        calls += 1;
        let outcome = state.step(grid);
        if strategy != Strategy::AStar {
            // Without relaxation every created node is either queued or visited
            assert_eq!(
                state.nodes().len(),
                state.visited_len() + state.frontier_len()
            );
        }
        if outcome.is_terminal() {
            break outcome;
        }
    };
    match outcome {
        StepOutcome::Found => assert_eq!(calls, state.visited_len()),
        _ => assert_eq!(calls, state.visited_len() + 1),
    }
    let length = state.reconstruct_path(grid).ok();
    (state, length)
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(0);
    for diagonal in [false, true] {
        for _ in 0..N_GRIDS {
            let mut grid = random_grid(N, N, &mut rng, diagonal, 0.4);
            let reachable = grid.reachable(&grid.start(), &grid.end());
            for strategy in Strategy::ALL {
                grid.clear_search_marks();
                let (state, length) = run(strategy, &mut grid);
                // Show the grid if the outcome disagrees with the components
                if length.is_some() != reachable {
                    visualize_grid(&grid);
                }
                assert_eq!(length.is_some(), reachable);
                assert_eq!(
                    state.status(),
                    if reachable {
                        SearchStatus::Succeeded
                    } else {
                        SearchStatus::Failed
                    }
                );
                if let Some(path) = state.path() {
                    assert_eq!(path.first(), Some(&grid.start()));
                    assert_eq!(path.last(), Some(&grid.end()));
                    assert_eq!(Some(path.len()), length);
                }
            }
        }
    }
}

#[test]
fn fuzz_distance() {
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(1);
    for diagonal in [false, true] {
        for density in [0.0, 0.2, 0.35] {
            for _ in 0..N_GRIDS {
                let w = rng.gen_range(2..12);
                let h = rng.gen_range(2..12);
                let mut grid = random_grid(w, h, &mut rng, diagonal, density);
                let (bfs, bfs_length) = run(Strategy::BreadthFirst, &mut grid);
                grid.clear_search_marks();
                let (_, astar_length) = run(Strategy::AStar, &mut grid);
                if bfs_length != astar_length {
                    println!("BFS: {bfs_length:?}; A*: {astar_length:?}; diagonal: {diagonal}");
                    visualize_grid(&grid);
                }
                assert_eq!(bfs_length, astar_length);
                if let (Some(goal), Some(length)) = (bfs.goal(), bfs_length) {
                    assert_eq!(goal.g_cost as usize + 1, length);
                }
            }
        }
    }
}

#[test]
fn fuzz_facade_stats() {
    const N_GRIDS: usize = 100;
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..N_GRIDS {
        let diagonal = rng.gen_bool(0.5);
        let grid = random_grid(8, 6, &mut rng, diagonal, 0.3);
        let reachable = grid.reachable(&grid.start(), &grid.end());
        let mut pathfinder = Pathfinder::from_grid(grid);
        for strategy in Strategy::ALL {
            let mut rendered = 0;
            let stats = pathfinder
                .run_with(strategy, |_, _| rendered += 1)
                .unwrap();
            assert_eq!(rendered, stats.steps);
            assert_eq!(stats.path_length.is_some(), reachable);
            assert_eq!(stats.strategy, Some(strategy));
        }
    }
}
