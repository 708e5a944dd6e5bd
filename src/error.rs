//! Error types returned by grid edits and the search state machine.
use grid_util::point::Point;
use thiserror::Error;

use crate::SearchStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The position lies outside the grid. Positions are never clamped.
    #[error("position ({}, {}) is outside the {width}x{height} grid", .point.x, .point.y)]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    /// The operation is not allowed in the current search state.
    #[error("cannot {operation} while search is {status}")]
    InvalidState {
        operation: &'static str,
        status: SearchStatus,
    },

    /// Start and end markers must occupy different cells.
    #[error("start and end cannot share cell ({}, {})", .point.x, .point.y)]
    MarkerOverlap { point: Point },

    /// The configuration cannot describe a grid.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("unknown search strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
