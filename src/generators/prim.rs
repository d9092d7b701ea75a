use std::collections::HashSet;

use super::{StepBuilder, at};
use crate::{
    animation::AnimationStep,
    grid::{CellState, Grid, Position},
    rng::RandomSource,
};

/// Randomized Prim's algorithm over the lattice of odd-coordinate rooms.
///
/// Requires the grid to be at least 3x3.
pub(super) fn randomized_prim(grid: &Grid, rng: &mut impl RandomSource) -> Vec<AnimationStep> {
    let rows = grid.rows();
    let cols = grid.cols();
    if rows < 3 || cols < 3 {
        return Vec::new();
    }

    let mut steps = Vec::new();

    // Initialize the maze with walls
    let mut fill = StepBuilder::new(grid);
    grid.cells().for_each(|(pos, _)| fill.set(pos, CellState::Wall));
    steps.extend(fill.build());

    // Rooms that are already part of the maze
    let mut visited = HashSet::new();
    // Cells already shown as frontier, so each is only painted once
    let mut marked = HashSet::new();
    // May hold duplicates; stale entries are skipped when picked
    let mut frontiers = Vec::new();

    let start = at(1, 1);
    visited.insert(start);
    let mut seed = StepBuilder::new(grid);
    seed.set(start, CellState::Empty);
    for neighbor in get_neighbors(start, grid) {
        frontiers.push(neighbor);
        if marked.insert(neighbor) {
            seed.set(neighbor, CellState::Frontier);
        }
    }
    steps.extend(seed.build());

    while !frontiers.is_empty() {
        // Randomly select a cell from the frontiers
        let idx = rng.index(frontiers.len());
        let frontier = frontiers.swap_remove(idx);
        if visited.contains(&frontier) {
            continue;
        }

        // Neighbors that are already part of the maze
        let connections = get_neighbors(frontier, grid)
            .filter(|neighbor| visited.contains(neighbor))
            .collect::<Vec<_>>();
        if connections.is_empty() {
            continue;
        }
        let connection = connections[rng.index(connections.len())];

        // Carve the frontier cell and the wall between it and the maze
        let mut carve = StepBuilder::new(grid);
        carve.set(between(frontier, connection), CellState::Empty);
        carve.set(frontier, CellState::Empty);
        visited.insert(frontier);

        for neighbor in get_neighbors(frontier, grid) {
            if visited.contains(&neighbor) {
                continue;
            }
            frontiers.push(neighbor);
            if marked.insert(neighbor) {
                carve.set(neighbor, CellState::Frontier);
            }
        }
        steps.extend(carve.build());
    }

    steps
}

/// Get distance-2 neighbors of a cell, enumerated north, south, west, east.
/// Only interior cells count: the outer ring of the grid always stays wall.
fn get_neighbors(pos: Position, grid: &Grid) -> impl Iterator<Item = Position> + '_ {
    let Position { row, col } = pos;
    [
        // NOTE: wrapping_sub turns an underflow into a huge coordinate that fails the
        // interior check, same for saturating_add at the top of the range.
        Position::new(row.wrapping_sub(2), col),
        Position::new(row.saturating_add(2), col),
        Position::new(row, col.wrapping_sub(2)),
        Position::new(row, col.saturating_add(2)),
    ]
    .into_iter()
    .filter(move |&p| {
        p.row > 0 && p.col > 0 && p.row < grid.rows() - 1 && p.col < grid.cols() - 1
    })
}

/// The cell halfway between two distance-2 neighbors.
fn between(a: Position, b: Position) -> Position {
    Position::new(
        a.row.min(b.row) + a.row.abs_diff(b.row) / 2,
        a.col.min(b.col) + a.col.abs_diff(b.col) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::get_rng;

    #[test]
    fn test_get_neighbors() {
        let grid = Grid::with_default_endpoints(7, 7);
        let neighbors = get_neighbors(Position::new(3, 3), &grid).collect::<Vec<_>>();
        assert_eq!(
            neighbors,
            vec![
                Position::new(1, 3),
                Position::new(5, 3),
                Position::new(3, 1),
                Position::new(3, 5)
            ]
        );
        let corner = get_neighbors(Position::new(1, 1), &grid).collect::<Vec<_>>();
        assert_eq!(corner, vec![Position::new(3, 1), Position::new(1, 3)]);
    }

    #[test]
    fn test_between() {
        assert_eq!(
            between(Position::new(3, 1), Position::new(1, 1)),
            Position::new(2, 1)
        );
        assert_eq!(
            between(Position::new(5, 3), Position::new(5, 5)),
            Position::new(5, 4)
        );
    }

    #[test]
    fn test_randomized_prim() {
        let grid = Grid::with_default_endpoints(9, 9);
        let steps = randomized_prim(&grid, &mut get_rng(Some(0)));
        // Bulk fill, seed, then one step per remaining room
        assert_eq!(steps[0].mutations.len(), 9 * 9 - 2);
        assert!(steps[0].mutations.iter().all(|m| m.state == CellState::Wall));
        assert_eq!(steps.len(), 2 + (4 * 4 - 1));

        let mut maze = grid.clone();
        steps.iter().for_each(|step| {
            maze.apply_step(step);
        });
        // Every room is open, the border is intact and no frontier marks are left behind
        for (pos, cell) in maze.cells() {
            let is_room = pos.row % 2 == 1 && pos.col % 2 == 1;
            let on_border = pos.row == 0 || pos.col == 0 || pos.row == 8 || pos.col == 8;
            if is_room {
                assert!(!cell.is_wall(), "room {} is walled", pos);
            }
            if on_border {
                assert!(cell.is_wall());
            }
            assert_ne!(cell.state, CellState::Frontier);
        }
    }
}
