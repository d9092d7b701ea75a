use std::collections::HashSet;

use super::{SearchTrace, Solver, passable_neighbors};
use crate::{
    animation::AlgorithmResult,
    grid::{Grid, Position},
};

/// Depth-first search. Exploratory only: the route it finds is not necessarily the shortest.
pub(super) fn solve_dfs(grid: &Grid, start: Position, end: Position) -> AlgorithmResult {
    let mut trace = SearchTrace::new(Solver::Dfs, start, end);

    let mut discovered = HashSet::from([start]);
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        trace.accept();
        if current == end {
            return trace.finish(true);
        }
        trace.mark_visited(current);

        // Push west, south, east, north so that north is popped first,
        // matching the apparent direction bias of BFS
        let neighbors = passable_neighbors(grid, current).collect::<Vec<_>>();
        for neighbor in neighbors.into_iter().rev() {
            if discovered.insert(neighbor) {
                trace.discover(neighbor, current);
                stack.push(neighbor);
            }
        }
    }

    trace.finish(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;

    #[test]
    fn test_dfs_explores_north_first() {
        let grid: Grid = "
            ...
            .S.
            ...
            ..E
        "
        .parse()
        .unwrap();
        let result = solve_dfs(&grid, grid.start(), grid.end());
        let first_visited = result
            .steps
            .iter()
            .map(|step| step.mutations[0])
            .find(|mutation| mutation.state == CellState::Visited)
            .map(|mutation| mutation.position);
        assert_eq!(first_visited, Some(Position::new(0, 1)));
        assert!(result.reached_end);
    }

    #[test]
    fn test_dfs_path_never_shorter_than_bfs() {
        let grid: Grid = "
            S....
            .#.#.
            .....
            .#.#.
            ....E
        "
        .parse()
        .unwrap();
        let dfs = solve_dfs(&grid, grid.start(), grid.end());
        let bfs = super::super::bfs::solve_bfs(&grid, grid.start(), grid.end());
        assert!(dfs.stats.path_length >= bfs.stats.path_length);
        assert_eq!(bfs.stats.path_length, 7);
    }
}
