//! # grid_search_stepper
//!
//! Step-by-step grid search meant for visualisation. A [Pathfinder] owns a [PathingGrid] of
//! [Cell]s and runs one of four strategies ([Strategy]): breadth-first, depth-first, greedy
//! best-first and A*. Each call to [Pathfinder::step] performs exactly one expansion and leaves
//! the grid in a state that can be drawn, so a driver (an animation timer, a terminal loop) can
//! render after every step and cancel between steps.
//!
//! Moves have unit cost. With diagonal moves enabled every cell has up to eight neighbours and the
//! heuristic is the Chebyshev distance; without them there are four neighbours and the heuristic
//! is the Manhattan distance.
//!
//! ```
//! use grid_search_stepper::{at, Pathfinder, StepOutcome, Strategy};
//!
//! let mut pathfinder = Pathfinder::new(5, 5).unwrap();
//! pathfinder.place_wall(at(1, 1)).unwrap();
//! pathfinder.start_search(Strategy::AStar);
//! while pathfinder.step().unwrap() == StepOutcome::Continue {
//!     // draw pathfinder.snapshot() here
//! }
//! assert_eq!(pathfinder.reconstruct_path(), Ok(6));
//! ```
pub mod config;
pub mod error;
pub mod node;
pub mod pathing_grid;
pub mod search_context;
pub mod solver;

use core::fmt;
use grid_util::point::Point;
use log::{info, warn};

pub use crate::config::GridConfig;
pub use crate::error::{Result, SearchError};
pub use crate::node::{Node, NodeId};
pub use crate::pathing_grid::{Cell, PathingGrid};
pub use crate::search_context::{Frontier, FrontierOrder, SearchState};
pub use crate::solver::{heuristic, GridSolver, StepOutcome, Strategy};

/// Width of the drawing area in pixels.
pub const GRID_WIDTH: usize = 900;
/// Height of the drawing area in pixels.
pub const GRID_HEIGHT: usize = 600;
/// Side of a single cell in pixels.
pub const CELL_SIZE: usize = 30;
pub const ROWS: usize = GRID_HEIGHT / CELL_SIZE;
pub const COLS: usize = GRID_WIDTH / CELL_SIZE;
/// Upper bound on the number of neighbours of a cell.
pub const N_SMALLVEC_SIZE: usize = 8;

/// Builds a [Point] from a row and a column.
pub fn at(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

/// Lifecycle of the search owned by a [Pathfinder].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Running => "running",
            SearchStatus::Succeeded => "succeeded",
            SearchStatus::Failed => "failed",
        })
    }
}

/// Summary of the last search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchStats {
    pub strategy: Option<Strategy>,
    pub status: SearchStatus,
    pub visited: usize,
    pub frontier: usize,
    pub steps: usize,
    /// [None] until a path has been reconstructed, and for unreachable goals.
    pub path_length: Option<usize>,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Observed Cells: {}, Queued Cells: {}, Path Length: ",
            self.visited, self.frontier
        )?;
        match self.path_length {
            Some(length) => write!(f, "{}", length),
            None => f.write_str("N/A"),
        }
    }
}

/// Owns the grid and at most one search. Edits and configuration are only accepted while no
/// search is running; the search itself only advances through [step](Pathfinder::step).
pub struct Pathfinder {
    grid: PathingGrid,
    search: Option<SearchState>,
    path_length: Option<usize>,
}

impl Pathfinder {
    pub fn new(width: usize, height: usize) -> Result<Pathfinder> {
        Ok(Pathfinder::from_grid(PathingGrid::new(width, height)?))
    }

    pub fn from_config(config: &GridConfig) -> Result<Pathfinder> {
        config.validate()?;
        let mut grid =
            PathingGrid::with_markers(config.cols(), config.rows(), config.start, config.end)?;
        grid.set_allow_diagonal_move(config.allow_diagonal_move);
        grid.update();
        Ok(Pathfinder::from_grid(grid))
    }

    pub fn from_grid(grid: PathingGrid) -> Pathfinder {
        Pathfinder {
            grid,
            search: None,
            path_length: None,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.search
            .as_ref()
            .map_or(SearchStatus::Idle, |search| search.status())
    }
    pub fn is_running(&self) -> bool {
        self.status() == SearchStatus::Running
    }
    /// Read-only view of the grid for rendering.
    pub fn snapshot(&self) -> &PathingGrid {
        &self.grid
    }
    /// The current or last finished search, if any.
    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }
    pub fn strategy(&self) -> Option<Strategy> {
        self.search.as_ref().map(|search| search.strategy())
    }
    pub fn allow_diagonal_move(&self) -> bool {
        self.grid.allow_diagonal_move()
    }

    fn ensure_not_running(&self, operation: &'static str) -> Result<()> {
        match self.status() {
            SearchStatus::Running => Err(SearchError::InvalidState {
                operation,
                status: SearchStatus::Running,
            }),
            _ => Ok(()),
        }
    }

    /// Enables or disables diagonal moves for the next search.
    pub fn configure(&mut self, allow_diagonal_move: bool) -> Result<()> {
        self.ensure_not_running("configure")?;
        self.grid.set_allow_diagonal_move(allow_diagonal_move);
        Ok(())
    }
    /// Flips diagonal moves and returns the new setting.
    pub fn toggle_diagonal(&mut self) -> Result<bool> {
        let allow = !self.grid.allow_diagonal_move();
        self.configure(allow)?;
        Ok(allow)
    }

    pub fn place_start(&mut self, pos: Point) -> Result<()> {
        self.ensure_not_running("place start")?;
        self.grid.set_start(pos)
    }
    pub fn place_end(&mut self, pos: Point) -> Result<()> {
        self.ensure_not_running("place end")?;
        self.grid.set_end(pos)
    }
    /// Turns a cell into a wall. The start and end cells are left alone.
    pub fn place_wall(&mut self, pos: Point) -> Result<()> {
        self.ensure_not_running("place wall")?;
        self.grid.place_wall(pos)
    }
    /// Empties a cell. The start and end cells are left alone.
    pub fn clear_cell(&mut self, pos: Point) -> Result<()> {
        self.ensure_not_running("clear cell")?;
        self.grid.clear_cell(pos)
    }

    /// Starts a new search from the start marker. A search that is still running is cancelled
    /// first. Marks left by earlier searches are wiped and the frontier holds only the start.
    pub fn start_search(&mut self, strategy: Strategy) {
        if self.is_running() {
            warn!("Starting a new search while one is running; cancelling it");
        }
        self.cancel();
        if !self.goal_reachable() {
            info!(
                "{} cannot be reached from {}; the search will exhaust the frontier",
                self.grid.end(),
                self.grid.start()
            );
        }
        self.search = Some(SearchState::new(strategy, &self.grid));
    }

    /// Whether the end marker is on the same connected component as the start, answered from
    /// the grid's components without searching. Stale components are regenerated first.
    pub fn goal_reachable(&mut self) -> bool {
        self.grid.update();
        self.grid.reachable(&self.grid.start(), &self.grid.end())
    }

    /// Performs one expansion of the running search.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.search.as_mut() {
            Some(search) if search.status() == SearchStatus::Running => {
                Ok(search.step(&mut self.grid))
            }
            _ => Err(SearchError::InvalidState {
                operation: "step",
                status: self.status(),
            }),
        }
    }

    /// Marks the path found by a successful search and returns its length in cells, counting
    /// both the start and the end.
    pub fn reconstruct_path(&mut self) -> Result<usize> {
        let status = self.status();
        match self.search.as_ref() {
            Some(search) if status == SearchStatus::Succeeded => {
                let length = search.reconstruct_path(&mut self.grid)?;
                self.path_length = Some(length);
                Ok(length)
            }
            _ => Err(SearchError::InvalidState {
                operation: "reconstruct path",
                status,
            }),
        }
    }

    /// Drops the current search and wipes its marks, keeping walls and markers.
    pub fn cancel(&mut self) {
        if let Some(search) = self.search.take() {
            info!("Discarding {} search ({})", search.strategy(), search.status());
        }
        self.path_length = None;
        self.grid.clear_search_marks();
    }

    /// Drops the current search and removes every wall.
    pub fn clear(&mut self) {
        self.cancel();
        self.grid.clear_walls();
        info!("Cleared grid");
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            strategy: self.strategy(),
            status: self.status(),
            visited: self.search.as_ref().map_or(0, |s| s.visited_len()),
            frontier: self.search.as_ref().map_or(0, |s| s.frontier_len()),
            steps: self.search.as_ref().map_or(0, |s| s.steps()),
            path_length: self.path_length,
        }
    }

    /// Runs a whole search without pausing.
    pub fn run(&mut self, strategy: Strategy) -> Result<SearchStats> {
        self.run_with(strategy, |_, _| {})
    }

    /// Runs a whole search, calling `on_step` with the grid after every step. When the goal is
    /// found the path is marked before the final call.
    pub fn run_with<F>(&mut self, strategy: Strategy, mut on_step: F) -> Result<SearchStats>
    where
        F: FnMut(&PathingGrid, StepOutcome),
    {
        self.start_search(strategy);
        loop {
            let outcome = self.step()?;
            if outcome == StepOutcome::Found {
                self.reconstruct_path()?;
            }
            on_step(&self.grid, outcome);
            if outcome.is_terminal() {
                break;
            }
        }
        let stats = self.stats();
        info!("{}", stats);
        Ok(stats)
    }
}

impl fmt::Display for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}
