use std::collections::{HashMap, HashSet};

use super::{SearchTrace, Solver, passable_neighbors, queue::MinQueue};
use crate::{
    animation::AlgorithmResult,
    grid::{Grid, Position},
};

/// Queue entry for A*.
struct Tracked {
    pos: Position,
    /// Cost to reach this cell from the start
    traveling_cost: u64,
    /// Estimated cost to reach the end from this cell
    heuristic_cost: u64,
}

/// A* search with the Manhattan distance to `end` as heuristic.
///
/// The heuristic never overestimates on a 4-connected grid whose weights are at least 1, so the
/// route found is as cheap as Dijkstra's. Ties on `g + h` prefer the entry closer to the end.
pub(super) fn solve_astar(grid: &Grid, start: Position, end: Position) -> AlgorithmResult {
    let mut trace = SearchTrace::new(Solver::AStar, start, end);
    let heuristic = |pos: Position| u64::from(pos.manhattan(end));

    let mut costs = HashMap::from([(start, 0u64)]);
    let mut finalized = HashSet::new();
    let mut pq = MinQueue::new(|tracked: &Tracked| {
        (
            tracked.traveling_cost + tracked.heuristic_cost,
            tracked.heuristic_cost,
        )
    });
    pq.push(Tracked {
        pos: start,
        traveling_cost: 0,
        heuristic_cost: heuristic(start),
    });

    while let Some(Tracked {
        pos: current,
        traveling_cost,
        ..
    }) = pq.pop()
    {
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
            let new_cost = traveling_cost + u64::from(grid[neighbor].weight);
            let is_cheaper = costs
                .get(&neighbor)
                .is_none_or(|&existing_cost| new_cost < existing_cost);
            if is_cheaper {
                costs.insert(neighbor, new_cost);
                trace.discover(neighbor, current);
                pq.push(Tracked {
                    pos: neighbor,
                    traveling_cost: new_cost,
                    heuristic_cost: heuristic(neighbor),
                });
            }
        }
    }

    trace.finish(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::dijkstra::solve_dijkstra;

    #[test]
    fn test_astar_heads_straight_for_the_goal() {
        let grid = Grid::new(5, 5, Position::new(0, 0), Position::new(4, 4));
        let astar = solve_astar(&grid, grid.start(), grid.end());
        let dijkstra = solve_dijkstra(&grid, grid.start(), grid.end());
        assert_eq!(astar.stats.path_length, 7);
        // Only the cells of one monotone route are expanded
        assert_eq!(astar.stats.visited_nodes, 9);
        assert_eq!(dijkstra.stats.visited_nodes, 25);
    }

    #[test]
    fn test_astar_matches_dijkstra_cost_with_weights() {
        let grid: Grid = "
            S.3..
            .#5#.
            .2..E
        "
        .parse()
        .unwrap();
        let astar = solve_astar(&grid, grid.start(), grid.end());
        let dijkstra = solve_dijkstra(&grid, grid.start(), grid.end());
        let cost = |result: &AlgorithmResult| {
            result
                .path_steps()
                .map(|step| u64::from(grid[step.mutations[0].position].weight))
                .sum::<u64>()
        };
        assert_eq!(cost(&astar), cost(&dijkstra));
        assert!(astar.stats.visited_nodes <= dijkstra.stats.visited_nodes);
    }
}
