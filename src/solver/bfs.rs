use crate::search_context::FrontierOrder;
use crate::solver::GridSolver;

/// Breadth-first search: expands nodes in the order they were discovered, so on a uniform-cost
/// grid the goal is reached along a shortest path.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirstSolver;

impl GridSolver for BreadthFirstSolver {
    fn frontier_order(&self) -> FrontierOrder {
        FrontierOrder::Fifo
    }
}
