pub mod cell;

use std::{fmt, str::FromStr};

use thiserror::Error;

pub use cell::{Cell, CellState};

use crate::animation::AnimationStep;

/// Zero-based `(row, col)` coordinate of a grid cell.
///
/// Positions are plain values, so they hash and compare structurally and can be used directly
/// as map keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u16,
    pub col: u16,
}

impl Position {
    pub const fn new(row: u16, col: u16) -> Self {
        Position { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Position) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }
}

impl From<(u16, u16)> for Position {
    fn from((row, col): (u16, u16)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular, row-major grid of cells with exactly one start and one end cell.
///
/// Algorithms only ever read a `&Grid`; the mutating methods exist for the playback layer and for
/// user edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    rows: u16,
    cols: u16,
    start: Position,
    end: Position,
}

impl Grid {
    /// Creates an open grid with the given endpoints.
    ///
    /// # Panics
    /// * If `rows` or `cols` is zero
    /// * If `start` or `end` is out of bounds, or if they are the same position
    pub fn new(rows: u16, cols: u16, start: Position, end: Position) -> Self {
        if rows == 0 || cols == 0 {
            panic!("Grid dimensions must be non-zero (got {}x{})", rows, cols);
        }
        if start == end {
            panic!("Start and end must be different cells (both at {})", start);
        }
        let data = vec![Cell::EMPTY; rows as usize * cols as usize].into_boxed_slice();
        let mut grid = Grid {
            data,
            rows,
            cols,
            start,
            end,
        };
        if !grid.in_bounds(start) || !grid.in_bounds(end) {
            panic!(
                "Endpoints {} and {} must lie inside a {}x{} grid",
                start, end, rows, cols
            );
        }
        grid.cell_mut(start).state = CellState::Start;
        grid.cell_mut(end).state = CellState::End;
        grid
    }

    /// Creates an open grid with the start in the top-left room `(1, 1)` and the end in the
    /// bottom-right room: the last odd row and column inside the border.
    ///
    /// Both endpoints sit on odd coordinates whatever the dimensions, which is where every maze
    /// generator carves its rooms. With odd dimensions the end is `(rows - 2, cols - 2)`.
    ///
    /// # Panics
    /// If the grid is smaller than 3x3, or if both endpoints would land on `(1, 1)`, which
    /// happens when neither dimension exceeds 4.
    pub fn with_default_endpoints(rows: u16, cols: u16) -> Self {
        if rows < 3 || cols < 3 {
            panic!("Grid must be at least 3x3 (got {}x{})", rows, cols);
        }
        Grid::new(
            rows,
            cols,
            Position::new(1, 1),
            Position::new(last_odd_inside(rows), last_odd_inside(cols)),
        )
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Whether `pos` is the start or end cell.
    pub fn is_endpoint(&self, pos: Position) -> bool {
        pos == self.start || pos == self.end
    }

    /// Bounds-checked cell access.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if self.in_bounds(pos) {
            Some(&self.data[self.ravel_index(pos)])
        } else {
            None
        }
    }

    /// Iterates every cell in row-major order together with its position.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let cols = self.cols as usize;
        self.data.iter().enumerate().map(move |(idx, cell)| {
            // Overflow-safe: idx < rows * cols and both fit in u16
            let pos = Position::new((idx / cols) as u16, (idx % cols) as u16);
            (pos, cell)
        })
    }

    /// Orthogonal in-bounds neighbors of `pos`, enumerated north, east, south, west.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let Position { row, col } = pos;
        [
            // NOTE: wrapping_sub turns -1 into u16::MAX and saturating_add caps at u16::MAX,
            // both of which fail the bounds check since dimensions are at most u16::MAX.
            Position::new(row.wrapping_sub(1), col),
            Position::new(row, col.saturating_add(1)),
            Position::new(row.saturating_add(1), col),
            Position::new(row, col.wrapping_sub(1)),
        ]
        .into_iter()
        .filter(move |&p| self.in_bounds(p))
    }

    fn ravel_index(&self, pos: Position) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.ravel_index(pos);
        &mut self.data[idx]
    }

    /// Applies every mutation of `step` and returns the positions whose state changed.
    ///
    /// Out-of-bounds targets are dropped. A start or end cell only accepts a mutation that
    /// re-asserts its own state, so endpoints can neither be overwritten nor duplicated.
    pub fn apply_step(&mut self, step: &AnimationStep) -> Vec<Position> {
        let mut changed = Vec::with_capacity(step.mutations.len());
        for mutation in &step.mutations {
            let pos = mutation.position;
            if !self.in_bounds(pos) {
                tracing::warn!(
                    "Dropping mutation to {} outside the {}x{} grid",
                    pos,
                    self.rows,
                    self.cols
                );
                continue;
            }
            let cell = self.cell_mut(pos);
            if cell.state.is_endpoint() || mutation.state.is_endpoint() {
                // Only a no-op re-assertion can target an endpoint
                continue;
            }
            if cell.state != mutation.state {
                cell.state = mutation.state;
                changed.push(pos);
            }
        }
        changed
    }

    /// Toggles a wall on a non-endpoint cell. Any search trace on the cell is replaced.
    /// Returns `true` if the cell changed.
    pub fn toggle_wall(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || self.is_endpoint(pos) {
            return false;
        }
        let cell = self.cell_mut(pos);
        cell.state = if cell.is_wall() {
            CellState::Empty
        } else {
            CellState::Wall
        };
        true
    }

    /// Sets the traversal cost of a cell. Weights below 1 are raised to 1.
    pub fn set_weight(&mut self, pos: Position, weight: u32) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.cell_mut(pos).weight = weight.max(Cell::DEFAULT_WEIGHT);
        true
    }

    /// Resets every non-endpoint cell to an empty cell with the default weight.
    pub fn reset(&mut self) {
        self.data
            .iter_mut()
            .filter(|cell| !cell.state.is_endpoint())
            .for_each(|cell| *cell = Cell::EMPTY);
    }

    /// Turns every wall into an empty cell, keeping weights and search traces.
    pub fn clear_walls(&mut self) {
        self.data
            .iter_mut()
            .filter(|cell| cell.is_wall())
            .for_each(|cell| cell.state = CellState::Empty);
    }

    /// Removes the frontier, visited and path states left by a search run.
    pub fn clear_path(&mut self) {
        self.data
            .iter_mut()
            .filter(|cell| cell.state.is_trace())
            .for_each(|cell| cell.state = CellState::Empty);
    }
}

/// Largest odd coordinate strictly inside a border of length `len` (at least 3).
fn last_odd_inside(len: u16) -> u16 {
    let last = len - 2;
    if last % 2 == 1 {
        last
    } else {
        last - 1
    }
}

impl std::ops::Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.data[self.ravel_index(pos)]
    }
}

/// Text layout, one line per row. Weighted empty cells print their weight as a digit, capped
/// at `9`. Walls, endpoints and search traces print their symbol only, so their weight is not
/// part of the layout.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.cells() {
            if pos.col == 0 && pos.row > 0 {
                writeln!(f)?;
            }
            let symbol = match cell.state {
                CellState::Empty if cell.weight > Cell::DEFAULT_WEIGHT => {
                    char::from_digit(cell.weight.min(9), 10).unwrap_or('9')
                }
                state => state.symbol(),
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Reasons a text layout cannot be turned into a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseGridError {
    #[error("grid layout is empty")]
    Empty,
    /// Row `row` has `found` cells while the first row has `expected`.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
    /// The layout needs exactly one `S` and one `E`.
    #[error("expected exactly one start and one end, found {starts} and {ends}")]
    Endpoints { starts: usize, ends: usize },
    #[error("grid dimensions exceed {}", u16::MAX)]
    TooLarge,
}

impl FromStr for Grid {
    type Err = ParseGridError;

    /// Parses the layout written by `Display`: `S` start, `E` end, `#` wall, `.` empty,
    /// `1`-`9` empty with that weight, `o` frontier, `v` visited, `*` path.
    /// Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let expected = match lines.first() {
            Some(first) => first.chars().count(),
            None => return Err(ParseGridError::Empty),
        };
        let rows = u16::try_from(lines.len()).map_err(|_| ParseGridError::TooLarge)?;
        let cols = u16::try_from(expected).map_err(|_| ParseGridError::TooLarge)?;

        let mut data = Vec::with_capacity(lines.len() * expected);
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(ParseGridError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = match symbol.to_digit(10) {
                    Some(weight) if weight > 0 => Cell {
                        state: CellState::Empty,
                        weight,
                    },
                    _ => CellState::from_symbol(symbol)
                        .map(Cell::new)
                        .ok_or(ParseGridError::UnknownSymbol { row, col, symbol })?,
                };
                // Overflow-safe: row < rows and col < cols, both checked against u16 above
                let pos = Position::new(row as u16, col as u16);
                match cell.state {
                    CellState::Start => starts.push(pos),
                    CellState::End => ends.push(pos),
                    _ => {}
                }
                data.push(cell);
            }
        }

        match (starts.as_slice(), ends.as_slice()) {
            (&[start], &[end]) => Ok(Grid {
                data: data.into_boxed_slice(),
                rows,
                cols,
                start,
                end,
            }),
            _ => Err(ParseGridError::Endpoints {
                starts: starts.len(),
                ends: ends.len(),
            }),
        }
    }
}
