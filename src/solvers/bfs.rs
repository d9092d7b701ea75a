use std::collections::{HashSet, VecDeque};

use super::{SearchTrace, Solver, passable_neighbors};
use crate::{
    animation::AlgorithmResult,
    grid::{Grid, Position},
};

/// Breadth-first search. Finds a route with the fewest moves; cell weights are ignored.
pub(super) fn solve_bfs(grid: &Grid, start: Position, end: Position) -> AlgorithmResult {
    let mut trace = SearchTrace::new(Solver::Bfs, start, end);

    // Cells are marked as discovered when enqueued, so each one is enqueued at most once
    let mut discovered = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        trace.accept();
        if current == end {
            return trace.finish(true);
        }
        trace.mark_visited(current);

        for neighbor in passable_neighbors(grid, current) {
            if discovered.insert(neighbor) {
                trace.discover(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    trace.finish(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{animation::Phase, grid::CellState};

    #[test]
    fn test_bfs_step_order() {
        let grid: Grid = "S..\n...\n..E".parse().unwrap();
        let result = solve_bfs(&grid, grid.start(), grid.end());
        let first = result
            .steps
            .iter()
            .take(3)
            .map(|step| (step.mutations[0].position, step.mutations[0].state))
            .collect::<Vec<_>>();
        // Start is never marked; its east then south neighbors are discovered, then east is expanded
        assert_eq!(
            first,
            vec![
                (Position::new(0, 1), CellState::Frontier),
                (Position::new(1, 0), CellState::Frontier),
                (Position::new(0, 1), CellState::Visited),
            ]
        );
        assert_eq!(result.stats.path_length, 3);
        assert_eq!(result.steps.last().map(|step| step.phase), Some(Phase::Path));
    }

    #[test]
    fn test_bfs_ignores_weights() {
        let grid: Grid = "S9E\n...".parse().unwrap();
        let result = solve_bfs(&grid, grid.start(), grid.end());
        let path = result
            .path_steps()
            .map(|step| step.mutations[0].position)
            .collect::<Vec<_>>();
        assert_eq!(path, vec![Position::new(0, 1)]);
    }
}
