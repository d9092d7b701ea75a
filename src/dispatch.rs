//! String-keyed entry points used by front ends that select algorithms by name.

use thiserror::Error;

use crate::{
    animation::{AlgorithmResult, AnimationStep},
    generators::{Generator, generate_maze},
    grid::{Grid, Position},
    rng::RandomSource,
    solvers::{Solver, search},
};

/// An algorithm key that names no known solver or generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown algorithm: {name}")]
pub struct UnknownAlgorithm {
    name: String,
}

impl UnknownAlgorithm {
    pub fn new(name: &str) -> Self {
        UnknownAlgorithm {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Runs the search algorithm registered under `name`.
///
/// Accepted names are `bfs`, `dfs`, `dijkstra` and `astar`. Any other name logs an error and
/// yields an empty result.
pub fn execute_graph_algorithm(
    name: &str,
    grid: &Grid,
    start: Position,
    end: Position,
) -> AlgorithmResult {
    match name.parse::<Solver>() {
        Ok(solver) => search(solver, grid, start, end),
        Err(e) => {
            tracing::error!("Unknown graph algorithm: {}", e.name());
            AlgorithmResult::default()
        }
    }
}

/// Runs the maze generator registered under `name`.
///
/// Accepted names are `recursive-division`, `randomized-prims` and `binary-tree`. Any other name
/// logs an error and yields no steps.
pub fn execute_maze_algorithm(
    name: &str,
    grid: &Grid,
    rng: &mut impl RandomSource,
) -> Vec<AnimationStep> {
    match name.parse::<Generator>() {
        Ok(generator) => generate_maze(generator, grid, rng),
        Err(e) => {
            tracing::error!("Unknown maze algorithm: {}", e.name());
            Vec::new()
        }
    }
}
