mod binary_tree;
mod prim;
mod recur_div;

use std::str::FromStr;

use binary_tree::binary_tree;
use prim::randomized_prim;
use recur_div::recursive_division;

use crate::{
    animation::{AnimationStep, CellMutation, Phase},
    dispatch::UnknownAlgorithm,
    grid::{CellState, Grid, Position},
    rng::RandomSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    RecurDiv,
    Prim,
    BinaryTree,
}

impl Generator {
    pub const ALL: [Generator; 3] = [Generator::RecurDiv, Generator::Prim, Generator::BinaryTree];

    /// Name used to select the generator at the dispatch boundary.
    pub fn key(self) -> &'static str {
        match self {
            Generator::RecurDiv => "recursive-division",
            Generator::Prim => "randomized-prims",
            Generator::BinaryTree => "binary-tree",
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurDiv => write!(f, "Recursive Division"),
            Generator::Prim => write!(f, "Randomized Prim's Algorithm"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
        }
    }
}

impl FromStr for Generator {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|generator| generator.key() == s)
            .ok_or_else(|| UnknownAlgorithm::new(s))
    }
}

/// Produces the steps that carve a maze into a grid shaped like `grid`.
///
/// Only the dimensions and endpoint positions of `grid` are read; replaying the steps overwrites
/// every other cell, so earlier walls or search traces do not leak into the maze.
pub fn generate_maze(
    generator: Generator,
    grid: &Grid,
    rng: &mut impl RandomSource,
) -> Vec<AnimationStep> {
    let steps = match generator {
        Generator::RecurDiv => recursive_division(grid, rng),
        Generator::Prim => randomized_prim(grid, rng),
        Generator::BinaryTree => binary_tree(grid, rng),
    };
    tracing::debug!(
        "{}: {} steps for a {}x{} grid",
        generator.key(),
        steps.len(),
        grid.rows(),
        grid.cols()
    );
    steps
}

/// Builds a single maze step, silently dropping mutations that target the start or end cell.
struct StepBuilder<'a> {
    grid: &'a Grid,
    mutations: Vec<CellMutation>,
}

impl<'a> StepBuilder<'a> {
    fn new(grid: &'a Grid) -> Self {
        StepBuilder {
            grid,
            mutations: Vec::new(),
        }
    }

    fn set(&mut self, pos: Position, state: CellState) {
        if !self.grid.is_endpoint(pos) {
            self.mutations.push(CellMutation::new(pos, state));
        }
    }

    /// The finished step, or `None` when every mutation was filtered out.
    fn build(self) -> Option<AnimationStep> {
        if self.mutations.is_empty() {
            None
        } else {
            Some(AnimationStep::new(self.mutations, Phase::Maze))
        }
    }
}

/// Position from `usize` coordinates that are known to lie inside the grid.
fn at(row: usize, col: usize) -> Position {
    // Overflow-safe: callers only pass coordinates below the grid's u16 dimensions
    Position::new(row as u16, col as u16)
}
