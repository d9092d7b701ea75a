use std::collections::{HashMap, HashSet};

use super::{SearchTrace, Solver, passable_neighbors, queue::MinQueue};
use crate::{
    animation::AlgorithmResult,
    grid::{Grid, Position},
};

/// Queue entry: a cell and the cumulative weight paid to reach it.
struct Tracked {
    pos: Position,
    cost: u64,
}

/// Dijkstra's algorithm over cell weights, where entering a cell costs its weight.
pub(super) fn solve_dijkstra(grid: &Grid, start: Position, end: Position) -> AlgorithmResult {
    let mut trace = SearchTrace::new(Solver::Dijkstra, start, end);

    // Best known cost to reach each cell
    let mut costs = HashMap::from([(start, 0u64)]);
    let mut finalized = HashSet::new();
    let mut pq = MinQueue::new(|tracked: &Tracked| tracked.cost);
    pq.push(Tracked {
        pos: start,
        cost: 0,
    });

    while let Some(Tracked { pos: current, cost }) = pq.pop() {
        // Lazy deletion: stale entries for finalized cells are skipped here
        if !finalized.insert(current) {
            continue;
        }
        trace.accept();
        if current == end {
            return trace.finish(true);
        }
        trace.mark_visited(current);

        for neighbor in passable_neighbors(grid, current) {
            if finalized.contains(&neighbor) {
                continue;
            }
            let new_cost = cost + u64::from(grid[neighbor].weight);
            let is_cheaper = costs
                .get(&neighbor)
                .is_none_or(|&existing_cost| new_cost < existing_cost);
            if is_cheaper {
                costs.insert(neighbor, new_cost);
                trace.discover(neighbor, current);
                pq.push(Tracked {
                    pos: neighbor,
                    cost: new_cost,
                });
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
    fn test_dijkstra_avoids_heavy_cells() {
        // The middle row is the only route that avoids both heavy cells
        let grid: Grid = "
            S9.
            ...
            .5E
        "
        .parse()
        .unwrap();
        let result = solve_dijkstra(&grid, grid.start(), grid.end());
        assert_eq!(result.stats.path_length, 3);
        let path = result
            .path_steps()
            .map(|step| step.mutations[0].position)
            .collect::<Vec<_>>();
        assert!(!path.contains(&Position::new(0, 1)));
        assert!(!path.contains(&Position::new(2, 1)));
    }

    #[test]
    fn test_dijkstra_emits_each_cell_visited_once() {
        let grid: Grid = "
            S...
            .2..
            ...E
        "
        .parse()
        .unwrap();
        let result = solve_dijkstra(&grid, grid.start(), grid.end());
        let mut visited = result
            .steps
            .iter()
            .map(|step| step.mutations[0])
            .filter(|mutation| mutation.state == CellState::Visited)
            .map(|mutation| mutation.position)
            .collect::<Vec<_>>();
        let total = visited.len();
        visited.sort();
        visited.dedup();
        assert_eq!(visited.len(), total);
        assert_eq!(result.stats.visited_nodes, total + 2);
    }
}
