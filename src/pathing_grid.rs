use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::{Result, SearchError};
use crate::N_SMALLVEC_SIZE;

/// Classification of a single grid cell. [Start](Cell::Start) and [End](Cell::End) are markers
/// that always exist exactly once; [Visited](Cell::Visited), [Frontier](Cell::Frontier) and
/// [PathMark](Cell::PathMark) are written by a search and wiped when the next one starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Start,
    End,
    Visited,
    Frontier,
    PathMark,
}

impl Cell {
    pub fn is_marker(self) -> bool {
        matches!(self, Cell::Start | Cell::End)
    }
    pub fn is_search_mark(self) -> bool {
        matches!(self, Cell::Visited | Cell::Frontier | Cell::PathMark)
    }
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Visited => 'o',
            Cell::Frontier => '+',
            Cell::PathMark => '*',
        }
    }
}

// (dx, dy) offsets in the order N, E, S, W followed by NE, SE, SW, NW. Rows grow downwards.
const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// [PathingGrid] stores the [Cell] classification of every position together with the start and
/// end markers. Points use `x` for the column and `y` for the row. A [UnionFind] over the
/// traversable cells answers reachability queries without searching. The searches never read it;
/// it is rebuilt lazily, only when a query or a new search finds it dirty.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    start: Point,
    end: Point,
    allow_diagonal_move: bool,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl PathingGrid {
    /// Creates an empty grid with the start in the top-left and the end in the bottom-right
    /// corner. Grids need at least two cells to hold both markers.
    pub fn new(width: usize, height: usize) -> Result<PathingGrid> {
        let (w, h) = PathingGrid::checked_dimensions(width, height)?;
        PathingGrid::with_markers(width, height, Point::new(0, 0), Point::new(w - 1, h - 1))
    }

    /// Grid dimensions as coordinates. Every cell must be addressable by a [Point].
    fn checked_dimensions(width: usize, height: usize) -> Result<(i32, i32)> {
        match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) if width.checked_mul(height).is_some() => Ok((w, h)),
            _ => Err(SearchError::OutOfBounds {
                point: Point::new(i32::MAX, i32::MAX),
                width,
                height,
            }),
        }
    }

    pub fn with_markers(
        width: usize,
        height: usize,
        start: Point,
        end: Point,
    ) -> Result<PathingGrid> {
        PathingGrid::checked_dimensions(width, height)?;
        let mut grid = PathingGrid {
            cells: vec![Cell::Empty; width * height],
            width,
            height,
            start,
            end,
            allow_diagonal_move: true,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        let start_ix = grid.checked_ix(start)?;
        let end_ix = grid.checked_ix(end)?;
        if start_ix == end_ix {
            return Err(SearchError::MarkerOverlap { point: start });
        }
        grid.cells[start_ix] = Cell::Start;
        grid.cells[end_ix] = Cell::End;
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn allow_diagonal_move(&self) -> bool {
        self.allow_diagonal_move
    }
    /// Switching connectivity changes which cells are connected, so components are flagged dirty.
    pub fn set_allow_diagonal_move(&mut self, allow: bool) {
        if self.allow_diagonal_move != allow {
            self.allow_diagonal_move = allow;
            self.components_dirty = true;
        }
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }
    fn ix(&self, pos: Point) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }
    fn checked_ix(&self, pos: Point) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok(self.ix(pos))
        } else {
            Err(SearchError::OutOfBounds {
                point: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get_cell(&self, pos: Point) -> Result<Cell> {
        self.checked_ix(pos).map(|ix| self.cells[ix])
    }
    /// Like [get_cell](Self::get_cell) but yields [None] outside the grid.
    pub fn cell(&self, pos: Point) -> Option<Cell> {
        self.in_bounds(pos).then(|| self.cells[self.ix(pos)])
    }
    /// In bounds and not a wall.
    pub fn is_traversable(&self, pos: Point) -> bool {
        self.cell(pos).is_some_and(|c| c != Cell::Wall)
    }

    /// Writes a cell. Writing [Cell::Start] or [Cell::End] moves the respective marker; any other
    /// value leaves the markers alone, so writes onto the start or end cell are ignored.
    pub fn set_cell(&mut self, pos: Point, cell: Cell) -> Result<()> {
        let ix = self.checked_ix(pos)?;
        match cell {
            Cell::Start => return self.set_start(pos),
            Cell::End => return self.set_end(pos),
            _ => {}
        }
        let old = self.cells[ix];
        if old.is_marker() {
            debug!("Ignoring write of {:?} onto marker at {}", cell, pos);
            return Ok(());
        }
        self.cells[ix] = cell;
        self.update_components(pos, old == Cell::Wall, cell == Cell::Wall);
        Ok(())
    }

    /// Moves the start marker. The previous start cell becomes empty. Placing the start onto the
    /// end cell is ignored.
    pub fn set_start(&mut self, pos: Point) -> Result<()> {
        let ix = self.checked_ix(pos)?;
        if pos == self.end {
            warn!("Start cannot be placed on the end at {}", pos);
            return Ok(());
        }
        let old_ix = self.ix(self.start);
        self.cells[old_ix] = Cell::Empty;
        let was_wall = self.cells[ix] == Cell::Wall;
        self.cells[ix] = Cell::Start;
        self.start = pos;
        self.update_components(pos, was_wall, false);
        Ok(())
    }

    /// Moves the end marker. The previous end cell becomes empty. Placing the end onto the start
    /// cell is ignored.
    pub fn set_end(&mut self, pos: Point) -> Result<()> {
        let ix = self.checked_ix(pos)?;
        if pos == self.start {
            warn!("End cannot be placed on the start at {}", pos);
            return Ok(());
        }
        let old_ix = self.ix(self.end);
        self.cells[old_ix] = Cell::Empty;
        let was_wall = self.cells[ix] == Cell::Wall;
        self.cells[ix] = Cell::End;
        self.end = pos;
        self.update_components(pos, was_wall, false);
        Ok(())
    }

    pub fn place_wall(&mut self, pos: Point) -> Result<()> {
        self.set_cell(pos, Cell::Wall)
    }
    pub fn clear_cell(&mut self, pos: Point) -> Result<()> {
        self.set_cell(pos, Cell::Empty)
    }

    /// Records search progress on a cell. Markers and walls keep their classification; returns
    /// whether the cell was written.
    pub(crate) fn mark(&mut self, pos: Point, cell: Cell) -> bool {
        debug_assert!(cell.is_search_mark());
        match self.cell(pos) {
            Some(Cell::Wall) => {
                warn!("Search reached wall at {}; grid was edited during a search", pos);
                false
            }
            Some(c) if c.is_marker() => false,
            Some(_) => {
                let ix = self.ix(pos);
                self.cells[ix] = cell;
                true
            }
            None => false,
        }
    }

    /// Wipes [Visited](Cell::Visited), [Frontier](Cell::Frontier) and [PathMark](Cell::PathMark)
    /// cells, keeping walls and markers.
    pub fn clear_search_marks(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_search_mark()) {
            *cell = Cell::Empty;
        }
    }

    /// Empties every cell except the markers.
    pub fn clear_walls(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| !c.is_marker()) {
            *cell = Cell::Empty;
        }
        self.generate_components();
    }

    /// Candidate neighbours of a position, not filtered for bounds or walls. Cardinal directions
    /// come first, followed by the diagonals when `diagonal` is set.
    pub fn neighborhood_points(
        &self,
        pos: &Point,
        diagonal: bool,
    ) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        let diagonals: &[(i32, i32)] = if diagonal { &DIAGONAL_OFFSETS[..] } else { &[] };
        CARDINAL_OFFSETS
            .iter()
            .chain(diagonals)
            .map(|(dx, dy)| Point::new(pos.x + dx, pos.y + dy))
            .collect()
    }

    /// Neighbours that can be stepped onto.
    pub fn traversable_neighbours(
        &self,
        pos: &Point,
        diagonal: bool,
    ) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        self.neighborhood_points(pos, diagonal)
            .into_iter()
            .filter(|p| self.is_traversable(*p))
            .collect()
    }

    /// Every position with its cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        iproduct!(0..self.height as i32, 0..self.width as i32)
            .map(move |(y, x)| (Point::new(x, y), self.cells[y as usize * self.width + x as usize]))
    }
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width.max(1))
    }
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.in_bounds(*point)
            .then(|| self.components.find(self.ix(*point)))
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_traversable(*start) && self.is_traversable(*goal) {
            !self.components.equiv(self.ix(*start), self.ix(*goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up traversable neighbours under the current
    /// connectivity.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        let diagonal = self.allow_diagonal_move;
        for (y, x) in iproduct!(0..self.height as i32, 0..self.width as i32) {
            let point = Point::new(x, y);
            if !self.is_traversable(point) {
                continue;
            }
            let parent_ix = self.ix(point);
            for n in self.traversable_neighbours(&point, diagonal) {
                let ix = self.ix(n);
                self.components.union(parent_ix, ix);
            }
        }
    }

    /// Joins newly connected components when a wall disappears and flags the components as dirty
    /// when one appears, since a wall may split a component in two.
    fn update_components(&mut self, pos: Point, was_wall: bool, is_wall: bool) {
        if is_wall && !was_wall {
            self.components_dirty = true;
        } else if was_wall && !is_wall {
            let p_ix = self.ix(pos);
            for n in self.traversable_neighbours(&pos, self.allow_diagonal_move) {
                let n_ix = self.ix(n);
                self.components.union(p_ix, n_ix);
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
