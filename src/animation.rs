//! Step model shared by every algorithm.
//!
//! Algorithms never touch the grid they are given. They describe what they decided as an ordered
//! list of [`AnimationStep`]s, and the playback layer replays those steps onto a live grid.

use std::{fmt, time::Duration};

use crate::grid::{CellState, Position};

/// A single `setState` instruction for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMutation {
    pub position: Position,
    pub state: CellState,
}

impl CellMutation {
    pub const fn new(position: Position, state: CellState) -> Self {
        CellMutation { position, state }
    }
}

/// Category of a step, controlling how it is styled and paced on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Maze,
    Search,
    Path,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Maze => write!(f, "maze"),
            Phase::Search => write!(f, "search"),
            Phase::Path => write!(f, "path"),
        }
    }
}

/// The unit of replay: all mutations of a step are applied together before any pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationStep {
    pub mutations: Vec<CellMutation>,
    pub phase: Phase,
}

impl AnimationStep {
    pub fn new(mutations: Vec<CellMutation>, phase: Phase) -> Self {
        AnimationStep { mutations, phase }
    }

    /// A step holding exactly one mutation.
    pub fn single(position: Position, state: CellState, phase: Phase) -> Self {
        AnimationStep {
            mutations: vec![CellMutation::new(position, state)],
            phase,
        }
    }
}

/// Summary of one search run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes dequeued (or popped) and accepted for expansion, including the end node.
    pub visited_nodes: usize,
    /// Number of path-phase steps, i.e. intermediate cells of the route.
    pub path_length: usize,
    /// Wall-clock duration of the whole call.
    pub execution_time: Duration,
}

#[cfg(test)]
impl SearchStats {
    /// Stats equality ignoring `execution_time`, which differs between otherwise identical runs.
    pub fn same_counts(&self, other: &SearchStats) -> bool {
        self.visited_nodes == other.visited_nodes && self.path_length == other.path_length
    }
}

/// Output of a search: the finished step sequence and its statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlgorithmResult {
    pub steps: Vec<AnimationStep>,
    pub stats: SearchStats,
    /// Whether the end cell was dequeued. Adjacent endpoints reach the end with an empty path.
    pub reached_end: bool,
}

impl AlgorithmResult {
    /// Path-phase steps, in start-to-end order.
    pub fn path_steps(&self) -> impl Iterator<Item = &AnimationStep> {
        self.steps.iter().filter(|step| step.phase == Phase::Path)
    }
}
