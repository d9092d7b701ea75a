mod astar;
mod bfs;
mod dfs;
mod dijkstra;
pub mod queue;

use std::{
    collections::HashMap,
    str::FromStr,
    time::Instant,
};

use crate::{
    animation::{AlgorithmResult, AnimationStep, Phase, SearchStats},
    dispatch::UnknownAlgorithm,
    grid::{CellState, Grid, Position},
};
use astar::solve_astar;
use bfs::solve_bfs;
use dfs::solve_dfs;
use dijkstra::solve_dijkstra;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Bfs, Solver::Dfs, Solver::Dijkstra, Solver::AStar];

    /// Name used to select the solver at the dispatch boundary.
    pub fn key(self) -> &'static str {
        match self {
            Solver::Bfs => "bfs",
            Solver::Dfs => "dfs",
            Solver::Dijkstra => "dijkstra",
            Solver::AStar => "astar",
        }
    }

    /// Whether the solver reads cell weights.
    pub fn is_weighted(self) -> bool {
        matches!(self, Solver::Dijkstra | Solver::AStar)
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

impl FromStr for Solver {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Solver::ALL
            .into_iter()
            .find(|solver| solver.key() == s)
            .ok_or_else(|| UnknownAlgorithm::new(s))
    }
}

/// Runs `solver` from `start` to `end` and returns its steps and statistics.
///
/// Endpoints outside the grid fail fast with an empty result instead of exploring.
pub fn search(solver: Solver, grid: &Grid, start: Position, end: Position) -> AlgorithmResult {
    if !grid.in_bounds(start) || !grid.in_bounds(end) {
        tracing::warn!(
            "{}: endpoints {} -> {} are outside the {}x{} grid",
            solver.key(),
            start,
            end,
            grid.rows(),
            grid.cols()
        );
        return AlgorithmResult::default();
    }

    let result = match solver {
        Solver::Bfs => solve_bfs(grid, start, end),
        Solver::Dfs => solve_dfs(grid, start, end),
        Solver::Dijkstra => solve_dijkstra(grid, start, end),
        Solver::AStar => solve_astar(grid, start, end),
    };
    tracing::debug!(
        "{}: {} steps, {} visited, path length {}, {:?}",
        solver.key(),
        result.steps.len(),
        result.stats.visited_nodes,
        result.stats.path_length,
        result.stats.execution_time
    );
    result
}

/// In-bounds, non-wall neighbors of `pos`, enumerated north, east, south, west.
fn passable_neighbors(grid: &Grid, pos: Position) -> impl Iterator<Item = Position> + '_ {
    grid.neighbors(pos).filter(|&p| !grid[p].is_wall())
}

/// Step recorder shared by all solvers.
///
/// Keeps the parent map and the visitation counter, and makes sure the start and end cells never
/// receive a visitation mutation.
struct SearchTrace {
    solver: Solver,
    start: Position,
    end: Position,
    steps: Vec<AnimationStep>,
    /// Maps each discovered cell to the cell it was reached from
    parents: HashMap<Position, Position>,
    visited_nodes: usize,
    started: Instant,
}

impl SearchTrace {
    fn new(solver: Solver, start: Position, end: Position) -> Self {
        SearchTrace {
            solver,
            start,
            end,
            steps: Vec::new(),
            parents: HashMap::new(),
            visited_nodes: 0,
            started: Instant::now(),
        }
    }

    /// Counts a node taken off the frontier for expansion.
    fn accept(&mut self) {
        self.visited_nodes += 1;
    }

    fn mark_visited(&mut self, pos: Position) {
        if pos != self.start && pos != self.end {
            self.steps
                .push(AnimationStep::single(pos, CellState::Visited, Phase::Search));
        }
    }

    /// Records `parent` as the best known predecessor of `pos` and shows `pos` as frontier.
    fn discover(&mut self, pos: Position, parent: Position) {
        self.parents.insert(pos, parent);
        if pos != self.start && pos != self.end {
            self.steps
                .push(AnimationStep::single(pos, CellState::Frontier, Phase::Search));
        }
    }

    /// Intermediate cells of the route, in start-to-end order.
    fn reconstruct_path(&self) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = self.end;
        while let Some(&parent) = self.parents.get(&current) {
            if parent == self.start {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    fn finish(mut self, reached_end: bool) -> AlgorithmResult {
        let mut path_length = 0;
        if reached_end {
            let path = self.reconstruct_path();
            path_length = path.len();
            self.steps.extend(
                path.into_iter()
                    .map(|pos| AnimationStep::single(pos, CellState::Path, Phase::Path)),
            );
        } else {
            tracing::warn!(
                "{}: No path found from {} to {}",
                self.solver.key(),
                self.start,
                self.end
            );
        }
        AlgorithmResult {
            steps: self.steps,
            stats: SearchStats {
                visited_nodes: self.visited_nodes,
                path_length,
                execution_time: self.started.elapsed(),
            },
            reached_end,
        }
    }
}
