use std::fmt;

/// Display state of a single grid cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Open cell, not touched by any algorithm.
    #[default]
    Empty,
    Wall,
    /// The single start cell of the grid.
    Start,
    /// The single end (goal) cell of the grid.
    End,
    /// Discovered by a search but not yet expanded.
    Frontier,
    /// Expanded/finalized by a search.
    Visited,
    /// Part of the final route.
    Path,
}

impl CellState {
    /// Whether the state is one of the two fixed endpoints.
    pub fn is_endpoint(self) -> bool {
        matches!(self, CellState::Start | CellState::End)
    }

    /// Whether the state was left behind by a search run.
    pub fn is_trace(self) -> bool {
        matches!(
            self,
            CellState::Frontier | CellState::Visited | CellState::Path
        )
    }

    /// ASCII symbol used by the grid text layout.
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Wall => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Frontier => 'o',
            CellState::Visited => 'v',
            CellState::Path => '*',
        }
    }

    /// Inverse of [`CellState::symbol`].
    pub fn from_symbol(symbol: char) -> Option<CellState> {
        let state = match symbol {
            '.' => CellState::Empty,
            '#' => CellState::Wall,
            'S' => CellState::Start,
            'E' => CellState::End,
            'o' => CellState::Frontier,
            'v' => CellState::Visited,
            '*' => CellState::Path,
            _ => return None,
        };
        Some(state)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellState::Empty => "empty",
            CellState::Wall => "wall",
            CellState::Start => "start",
            CellState::End => "end",
            CellState::Frontier => "frontier",
            CellState::Visited => "visited",
            CellState::Path => "path",
        };
        write!(f, "{}", name)
    }
}

/// A grid cell: its display state and the cost of entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub state: CellState,
    /// Traversal cost, always at least 1. Only weighted solvers read it.
    pub weight: u32,
}

impl Cell {
    pub const DEFAULT_WEIGHT: u32 = 1;
    pub const EMPTY: Cell = Cell::new(CellState::Empty);
    pub const WALL: Cell = Cell::new(CellState::Wall);

    pub const fn new(state: CellState) -> Self {
        Cell {
            state,
            weight: Cell::DEFAULT_WEIGHT,
        }
    }

    pub fn is_wall(&self) -> bool {
        self.state == CellState::Wall
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for state in [
            CellState::Empty,
            CellState::Wall,
            CellState::Start,
            CellState::End,
            CellState::Frontier,
            CellState::Visited,
            CellState::Path,
        ] {
            assert_eq!(CellState::from_symbol(state.symbol()), Some(state));
        }
        assert_eq!(CellState::from_symbol('x'), None);
    }

    #[test]
    fn test_state_classes() {
        assert!(CellState::Start.is_endpoint());
        assert!(CellState::End.is_endpoint());
        assert!(!CellState::Wall.is_endpoint());
        assert!(CellState::Visited.is_trace());
        assert!(!CellState::Empty.is_trace());
        assert_eq!(Cell::default().weight, 1);
    }
}
