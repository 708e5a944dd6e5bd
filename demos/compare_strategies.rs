use grid_search_stepper::{at, GridConfig, Pathfinder, Strategy};

// Runs every strategy on the same grid, with and without diagonal moves, and prints the
// summary of each search followed by the final grid.
//
//  _______________
// |S   #         |
// |    #    #    |
// |    #    #    |
// |         #   E|
//  _______________

fn main() {
    let config = GridConfig::default();
    let mut pathfinder = Pathfinder::from_config(&config).unwrap();
    for row in 0..15 {
        pathfinder.place_wall(at(row, 10)).unwrap();
        pathfinder.place_wall(at(19 - row, 20)).unwrap();
    }
    for diagonal in [true, false] {
        pathfinder.configure(diagonal).unwrap();
        println!("End reachable (diagonal: {}): {}", diagonal, pathfinder.goal_reachable());
        for strategy in Strategy::ALL {
            let stats = pathfinder.run(strategy).unwrap();
            println!("{} (diagonal: {}): {}", strategy, diagonal, stats);
            println!("{}", pathfinder);
        }
    }
}
