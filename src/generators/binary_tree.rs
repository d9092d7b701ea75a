use super::{StepBuilder, at};
use crate::{
    animation::AnimationStep,
    grid::{CellState, Grid},
    rng::RandomSource,
};

/// Direction in which a room is joined to its neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    East,
    South,
}

/// Binary tree maze: every room links east or south, chosen by a coin flip when both exist.
///
/// Links are decided for the whole grid first, then the maze is revealed one row per step.
pub(super) fn binary_tree(grid: &Grid, rng: &mut impl RandomSource) -> Vec<AnimationStep> {
    let rows = grid.rows() as usize;
    let cols = grid.cols() as usize;
    let links = decide_links(rows, cols, rng);
    let link_at = |row: usize, col: usize| links[row * cols + col];
    // Rooms sit on odd coordinates inside the border
    let is_room = |row: usize, col: usize| {
        row % 2 == 1 && col % 2 == 1 && row < rows - 1 && col < cols - 1
    };

    let mut steps = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut step = StepBuilder::new(grid);
        for col in 0..cols {
            let open = if row % 2 == 1 {
                // Rooms, plus the gap east of a room that links east
                is_room(row, col) || (col >= 2 && link_at(row, col - 1) == Some(Link::East))
            } else {
                // Gaps below rooms that link south
                row > 0 && col % 2 == 1 && link_at(row - 1, col) == Some(Link::South)
            };
            let state = if open {
                CellState::Empty
            } else {
                CellState::Wall
            };
            step.set(at(row, col), state);
        }
        steps.extend(step.build());
    }
    steps
}

/// Link table indexed like the grid; only rooms ever hold a link.
fn decide_links(rows: usize, cols: usize, rng: &mut impl RandomSource) -> Vec<Option<Link>> {
    let mut links = vec![None; rows * cols];
    // The last row and column are border, even when they fall on odd coordinates
    for row in (1..rows - 1).step_by(2) {
        for col in (1..cols - 1).step_by(2) {
            let has_east = col + 2 < cols - 1;
            let has_south = row + 2 < rows - 1;
            links[row * cols + col] = match (has_east, has_south) {
                (true, true) => Some(if rng.coin() { Link::East } else { Link::South }),
                (true, false) => Some(Link::East),
                (false, true) => Some(Link::South),
                (false, false) => None,
            };
        }
    }
    links
}
