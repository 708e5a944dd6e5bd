use crate::search_context::FrontierOrder;
use crate::solver::GridSolver;

/// Depth-first search: always continues from the most recently discovered node. Finds a path
/// whenever one exists but makes no promise about its length.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthFirstSolver;

impl GridSolver for DepthFirstSolver {
    fn frontier_order(&self) -> FrontierOrder {
        FrontierOrder::Lifo
    }
}

#[cfg(test)]
mod tests {
    use grid_util::point::Point;

    use crate::pathing_grid::PathingGrid;
    use crate::search_context::SearchState;
    use crate::solver::{StepOutcome, Strategy};

    #[test]
    fn follows_last_discovered_neighbour() {
        // Neighbours are discovered N, E, S, W, so the west neighbour is expanded next
        let mut grid = PathingGrid::with_markers(3, 3, Point::new(1, 1), Point::new(2, 2)).unwrap();
        grid.set_allow_diagonal_move(false);
        let mut state = SearchState::new(Strategy::DepthFirst, &grid);
        assert_eq!(state.step(&mut grid), StepOutcome::Continue);
        assert_eq!(state.frontier_len(), 4);
        assert_eq!(state.step(&mut grid), StepOutcome::Continue);
        assert_eq!(state.visited().last().map(|n| n.pos), Some(Point::new(0, 1)));
    }

    #[test]
    fn finds_a_path_through_a_corridor() {
        // |S#E|
        // |.#.|
        // |...|
        let mut grid = PathingGrid::with_markers(3, 3, Point::new(0, 0), Point::new(2, 0)).unwrap();
        grid.set_allow_diagonal_move(false);
        grid.place_wall(Point::new(1, 0)).unwrap();
        grid.place_wall(Point::new(1, 1)).unwrap();
        let mut state = SearchState::new(Strategy::DepthFirst, &grid);
        let mut steps = 0;
        while !state.step(&mut grid).is_terminal() {
            steps += 1;
        }
        assert_eq!(steps + 1, state.visited_len());
        assert_eq!(state.reconstruct_path(&mut grid), Ok(7));
        assert_eq!(state.nodes().len(), state.visited_len() + state.frontier_len());
    }
}
