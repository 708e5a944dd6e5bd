use grid_util::point::Point;

use crate::error::{Result, SearchError};
use crate::{at, CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};

/// Dimensions of the drawing area and the initial placement of the markers. The grid size is
/// derived from the pixel area and the cell size, so a 900x600 area with 30px cells gives 20 rows
/// of 30 columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub width_px: usize,
    pub height_px: usize,
    pub cell_size: usize,
    pub allow_diagonal_move: bool,
    pub start: Point,
    pub end: Point,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        let rows = GRID_HEIGHT / CELL_SIZE;
        let cols = GRID_WIDTH / CELL_SIZE;
        GridConfig {
            width_px: GRID_WIDTH,
            height_px: GRID_HEIGHT,
            cell_size: CELL_SIZE,
            allow_diagonal_move: true,
            start: at(1, 1),
            end: at(rows as i32 - 2, cols as i32 - 2),
        }
    }
}

impl GridConfig {
    /// Rejects a cell size that is zero or too large to convert pixel offsets with.
    pub fn validate(&self) -> Result<()> {
        match i32::try_from(self.cell_size) {
            Ok(size) if size > 0 => Ok(()),
            Ok(_) => Err(SearchError::InvalidConfig("cell size must be positive")),
            Err(_) => Err(SearchError::InvalidConfig("cell size does not fit in i32")),
        }
    }
    /// Number of whole rows in the drawing area, zero when the cell size is zero.
    pub fn rows(&self) -> usize {
        self.height_px.checked_div(self.cell_size).unwrap_or(0)
    }
    pub fn cols(&self) -> usize {
        self.width_px.checked_div(self.cell_size).unwrap_or(0)
    }
    /// Converts a pixel offset inside the drawing area to the cell it falls in. The result may be
    /// outside the grid; callers validate it through the grid edits.
    pub fn cell_at_pixel(&self, x_px: i32, y_px: i32) -> Result<Point> {
        self.validate()?;
        let size = self.cell_size as i32;
        Ok(Point::new(x_px.div_euclid(size), y_px.div_euclid(size)))
    }
}
