use core::fmt;
use grid_util::point::Point;
use std::str::FromStr;

use crate::error::SearchError;
use crate::node::{Node, NodeId};
use crate::pathing_grid::{Cell, PathingGrid};
use crate::search_context::{FrontierOrder, SearchState};

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod greedy;

use astar::AstarSolver;
use bfs::BreadthFirstSolver;
use dfs::DepthFirstSolver;
use greedy::GreedySolver;

/// Result of a single expansion step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// A node was expanded and the frontier may hold more.
    Continue,
    /// The expanded node was the goal.
    Found,
    /// The frontier was empty, the goal is unreachable.
    Exhausted,
}

impl StepOutcome {
    pub fn is_terminal(self) -> bool {
        self != StepOutcome::Continue
    }
}

/// The four interchangeable search strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    Greedy,
    #[default]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::AStar,
        Strategy::Greedy,
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
    ];

    /// Short identifier, also accepted by [FromStr].
    pub fn key(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "BFS",
            Strategy::DepthFirst => "DFS",
            Strategy::Greedy => "Greedy BFS",
            Strategy::AStar => "A*",
        }
    }

    pub fn solver(self) -> &'static dyn GridSolver {
        match self {
            Strategy::BreadthFirst => &BreadthFirstSolver,
            Strategy::DepthFirst => &DepthFirstSolver,
            Strategy::Greedy => &GreedySolver,
            Strategy::AStar => &AstarSolver,
        }
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Strategy, SearchError> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| {
                s.eq_ignore_ascii_case(strategy.key()) || s.eq_ignore_ascii_case(strategy.label())
            })
            .ok_or_else(|| SearchError::UnknownStrategy(s.to_owned()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated remaining steps between two points. With diagonal moves a single step covers one
/// row and one column, giving the [Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance);
/// without them it is the Manhattan distance. Either way it never overestimates the step count
/// under the matching connectivity.
pub fn heuristic(p1: &Point, p2: &Point, allow_diagonal_move: bool) -> i32 {
    let delta_x = (p1.x - p2.x).abs();
    let delta_y = (p1.y - p2.y).abs();
    if allow_diagonal_move {
        delta_x.max(delta_y)
    } else {
        delta_x + delta_y
    }
}

/// The step contract shared by every strategy. A strategy chooses how its frontier is ordered
/// and how a newly seen neighbour is handled; [step](GridSolver::step) does the rest.
pub trait GridSolver {
    fn frontier_order(&self) -> FrontierOrder;

    /// Key used by [FrontierOrder::Priority] frontiers, lowest first.
    fn priority(&self, _node: &Node) -> i32 {
        0
    }

    /// Heuristic assigned to a node when it is first created.
    fn h_cost(&self, _pos: &Point, _goal: &Point, _allow_diagonal_move: bool) -> i32 {
        0
    }

    /// Handles a traversable, not yet visited neighbour of `parent`. By default a position that is
    /// already queued is left alone, so it is queued at most once.
    fn discover(
        &self,
        grid: &mut PathingGrid,
        state: &mut SearchState,
        parent: NodeId,
        pos: Point,
    ) {
        if state.frontier().contains(&pos) {
            return;
        }
        let node = Node {
            pos,
            predecessor: Some(parent),
            g_cost: state.node(parent).g_cost + 1,
            h_cost: self.h_cost(&pos, &state.end(), state.allow_diagonal_move()),
        };
        state.push_frontier(grid, node);
    }

    /// Pops one node from the frontier, records it as visited and, unless it is the goal, hands
    /// its neighbours to [discover](GridSolver::discover).
    fn step(&self, grid: &mut PathingGrid, state: &mut SearchState) -> StepOutcome {
        let Some(current) = state.pop_frontier() else {
            return StepOutcome::Exhausted;
        };
        let pos = state.node(current).pos;
        state.close(current);
        grid.mark(pos, Cell::Visited);
        if pos == state.end() {
            return StepOutcome::Found;
        }
        for neighbour in grid.neighborhood_points(&pos, state.allow_diagonal_move()) {
            if grid.is_traversable(neighbour) && !state.is_visited(&neighbour) {
                self.discover(grid, state, current, neighbour);
            }
        }
        StepOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_labels_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.key().parse::<Strategy>(), Ok(strategy));
            assert_eq!(strategy.label().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("A*".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!("BFS".parse::<Strategy>(), Ok(Strategy::BreadthFirst));
        assert_eq!(
            "dijkstra".parse::<Strategy>(),
            Err(SearchError::UnknownStrategy("dijkstra".to_owned()))
        );
        assert_eq!(Strategy::default(), Strategy::AStar);
    }

    #[test]
    fn heuristic_matches_connectivity() {
        let a = Point::new(1, 1);
        let b = Point::new(28, 18);
        assert_eq!(heuristic(&a, &b, false), 44);
        assert_eq!(heuristic(&a, &b, true), 27);
        assert_eq!(heuristic(&a, &a, true), 0);
    }

    #[test]
    fn frontier_orders() {
        assert_eq!(
            Strategy::BreadthFirst.solver().frontier_order(),
            FrontierOrder::Fifo
        );
        assert_eq!(
            Strategy::DepthFirst.solver().frontier_order(),
            FrontierOrder::Lifo
        );
        assert_eq!(
            Strategy::Greedy.solver().frontier_order(),
            FrontierOrder::Priority
        );
        assert_eq!(
            Strategy::AStar.solver().frontier_order(),
            FrontierOrder::Priority
        );
    }
}
