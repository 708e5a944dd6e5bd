use grid_util::point::Point;
use log::debug;

use crate::node::{Node, NodeId};
use crate::pathing_grid::PathingGrid;
use crate::search_context::{FrontierOrder, SearchState};
use crate::solver::{heuristic, GridSolver};

/// A* search ordered by `g_cost + h_cost`. A queued node is replaced when a cheaper way to its
/// position turns up; visited nodes are never reopened.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstarSolver;

impl GridSolver for AstarSolver {
    fn frontier_order(&self) -> FrontierOrder {
        FrontierOrder::Priority
    }

    fn priority(&self, node: &Node) -> i32 {
        node.f_cost()
    }

    fn h_cost(&self, pos: &Point, goal: &Point, allow_diagonal_move: bool) -> i32 {
        heuristic(pos, goal, allow_diagonal_move)
    }

    fn discover(
        &self,
        grid: &mut PathingGrid,
        state: &mut SearchState,
        parent: NodeId,
        pos: Point,
    ) {
        let g_cost = state.node(parent).g_cost + 1;
        let queued_cost = state.frontier_node(&pos).map(|n| n.g_cost);
        if queued_cost.is_some_and(|c| c <= g_cost) {
            return;
        }
        let node = Node {
            pos,
            predecessor: Some(parent),
            g_cost,
            h_cost: self.h_cost(&pos, &state.end(), state.allow_diagonal_move()),
        };
        if let Some(old_cost) = queued_cost {
            debug!("Relaxing {} from g = {} to g = {}", pos, old_cost, g_cost);
            state.replace_frontier(node);
        } else {
            state.push_frontier(grid, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathing_grid::Cell;
    use crate::solver::{StepOutcome, Strategy};
    use crate::SearchStatus;

    fn run(grid: &mut PathingGrid) -> SearchState {
        let mut state = SearchState::new(Strategy::AStar, grid);
        while !state.step(grid).is_terminal() {}
        state
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        for allow_diag in [false, true] {
            let mut grid = PathingGrid::new(2, 1).unwrap();
            let start = grid.start();
            let mut state = SearchState::with_endpoints(Strategy::AStar, start, start, allow_diag);
            assert_eq!(state.step(&mut grid), StepOutcome::Found);
            assert_eq!(state.reconstruct_path(&mut grid), Ok(1));
            assert_eq!(grid.get_cell(start), Ok(Cell::Start));
        }
    }

    /// Asserts that the optimal solution is found.
    #[test]
    fn solve_simple_problem() {
        for (allow_diag, expected) in [(false, 5), (true, 4)] {
            let mut grid = PathingGrid::new(3, 3).unwrap();
            grid.set_allow_diagonal_move(allow_diag);
            grid.place_wall(Point::new(1, 1)).unwrap();
            let state = run(&mut grid);
            assert_eq!(state.reconstruct_path(&mut grid), Ok(expected));
        }
    }

    #[test]
    fn test_complex() {
        for (allow_diag, expected) in [(false, 15), (true, 9)] {
            let mut grid =
                PathingGrid::with_markers(10, 10, Point::new(0, 0), Point::new(7, 7)).unwrap();
            for wall in [(1, 1), (5, 0), (0, 5), (8, 8)] {
                grid.place_wall(Point::new(wall.0, wall.1)).unwrap();
            }
            grid.set_allow_diagonal_move(allow_diag);
            let state = run(&mut grid);
            assert_eq!(state.reconstruct_path(&mut grid), Ok(expected));
        }
    }

    // Tests whether allowing diagonals has the expected effect on path existence in a minimal setting.
    #[test]
    fn test_diagonal_switch_path() {
        //  __
        // |S#|
        // |#E|
        //  __
        let mut grid = PathingGrid::new(2, 2).unwrap();
        grid.place_wall(Point::new(1, 0)).unwrap();
        grid.place_wall(Point::new(0, 1)).unwrap();
        grid.set_allow_diagonal_move(false);
        assert_eq!(run(&mut grid).status(), SearchStatus::Failed);
        grid.clear_search_marks();
        grid.set_allow_diagonal_move(true);
        assert_eq!(run(&mut grid).status(), SearchStatus::Succeeded);
    }

    #[test]
    fn cheaper_route_replaces_queued_node() {
        let mut grid = PathingGrid::new(6, 6).unwrap();
        let end = grid.end();
        let mut state = SearchState::with_endpoints(Strategy::AStar, Point::new(0, 0), end, false);
        // Expand the start so (1, 0) and (0, 1) are queued with g = 1
        assert_eq!(state.step(&mut grid), StepOutcome::Continue);
        let root = NodeId(0);
        let far = state.frontier().get(&Point::new(1, 0)).unwrap();

        // Discovered from (1, 0), so (2, 0) is queued with g = 2
        AstarSolver.discover(&mut grid, &mut state, far, Point::new(2, 0));
        assert_eq!(state.frontier_node(&Point::new(2, 0)).map(|n| n.g_cost), Some(2));

        // A parent with g = 0 offers g = 1 and takes over
        AstarSolver.discover(&mut grid, &mut state, root, Point::new(2, 0));
        let relaxed = state.frontier_node(&Point::new(2, 0)).unwrap();
        assert_eq!(relaxed.g_cost, 1);
        assert_eq!(relaxed.predecessor, Some(root));
        assert_eq!(state.relaxations(), 1);

        // A costlier offer leaves the queued node alone
        AstarSolver.discover(&mut grid, &mut state, far, Point::new(2, 0));
        assert_eq!(state.frontier_node(&Point::new(2, 0)).map(|n| n.g_cost), Some(1));
        assert_eq!(state.relaxations(), 1);
        assert_eq!(state.frontier_len(), 3);
    }

    #[test]
    fn visited_nodes_are_never_reopened() {
        let mut grid = PathingGrid::new(12, 9).unwrap();
        for y in 0..7 {
            grid.place_wall(Point::new(5, y)).unwrap();
        }
        let mut state = SearchState::new(Strategy::AStar, &grid);
        let mut calls = 0;
        loop {
            calls += 1;
            if state.step(&mut grid).is_terminal() {
                break;
            }
        }
        assert_eq!(state.status(), SearchStatus::Succeeded);
        assert_eq!(calls, state.visited_len());
        let mut seen = std::collections::HashSet::new();
        assert!(state.visited().all(|n| seen.insert(n.pos)));
    }
}
