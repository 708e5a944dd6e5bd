use grid_search_stepper::{at, GridConfig, Pathfinder, StepOutcome, Strategy};
use std::env;
use std::thread;
use std::time::Duration;

// Animates a search in the terminal, redrawing the grid after every step.
//
// Usage: step_through [bfs|dfs|greedy|astar] [--no-diagonal]
//
// Legend:
// - S start, E end, # wall
// - o visited, + frontier, * path

fn main() {
    let mut strategy = Strategy::AStar;
    let mut config = GridConfig::default();
    for arg in env::args().skip(1) {
        if arg == "--no-diagonal" {
            config.allow_diagonal_move = false;
        } else {
            strategy = match arg.parse() {
                Ok(strategy) => strategy,
                Err(e) => {
                    eprintln!("{}", e);
                    return;
                }
            };
        }
    }

    let mut pathfinder = Pathfinder::from_config(&config).unwrap();
    for row in 0..15 {
        pathfinder.place_wall(at(row, 10)).unwrap();
        pathfinder.place_wall(at(19 - row, 20)).unwrap();
    }

    pathfinder.start_search(strategy);
    loop {
        let outcome = pathfinder.step().unwrap();
        if outcome == StepOutcome::Found {
            pathfinder.reconstruct_path().unwrap();
        }
        print!("\x1B[2J\x1B[H{}", pathfinder);
        println!("{}: {}", strategy, pathfinder.stats());
        if outcome.is_terminal() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
}
