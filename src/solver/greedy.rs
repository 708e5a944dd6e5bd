use grid_util::point::Point;

use crate::node::Node;
use crate::search_context::FrontierOrder;
use crate::solver::{heuristic, GridSolver};

/// Greedy best-first search: expands whichever queued node looks closest to the goal. The
/// heuristic is computed once, when a position is first discovered.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySolver;

impl GridSolver for GreedySolver {
    fn frontier_order(&self) -> FrontierOrder {
        FrontierOrder::Priority
    }

    fn priority(&self, node: &Node) -> i32 {
        node.h_cost
    }

    fn h_cost(&self, pos: &Point, goal: &Point, allow_diagonal_move: bool) -> i32 {
        heuristic(pos, goal, allow_diagonal_move)
    }
}
