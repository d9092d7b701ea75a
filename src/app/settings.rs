use std::{fmt, path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::{generators::Generator, grid::Position, solvers::Solver};

/// Replay speed of a search animation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    /// Pause between two batches of search steps.
    pub fn delay(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(200),
            Speed::Medium => Duration::from_millis(100),
            Speed::Fast => Duration::from_millis(20),
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Slow => write!(f, "slow"),
            Speed::Medium => write!(f, "medium"),
            Speed::Fast => write!(f, "fast"),
        }
    }
}

/// What the visualizer is currently doing. Only one algorithm runs against a grid at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Idle,
    GeneratingMaze,
    RunningAlgorithm,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Idle => write!(f, "idle"),
            AppMode::GeneratingMaze => write!(f, "generating-maze"),
            AppMode::RunningAlgorithm => write!(f, "running-algorithm"),
        }
    }
}

/// Grid pathfinding and maze generation visualizer for the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Number of grid rows. With an even size the last odd row stays part of the border.
    #[arg(long, default_value_t = 21, value_parser = clap::value_parser!(u16).range(5..))]
    pub rows: u16,

    /// Number of grid columns.
    #[arg(long, default_value_t = 41, value_parser = clap::value_parser!(u16).range(5..))]
    pub cols: u16,

    /// Text layout to load instead of an open grid: `S` start, `E` end, `#` wall, `.` empty,
    /// `1`-`9` an empty cell with that weight.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["rows", "cols"])]
    pub grid: Option<PathBuf>,

    /// Remove every wall of the grid before searching, keeping weights.
    #[arg(long)]
    pub clear_walls: bool,

    /// Toggle a wall before searching. May be repeated.
    #[arg(long = "wall", value_name = "ROW,COL", value_parser = parse_position)]
    pub walls: Vec<Position>,

    /// Set the cost of entering a cell before searching. May be repeated.
    #[arg(long = "weight", value_name = "ROW,COL,WEIGHT", value_parser = parse_weight_edit)]
    pub weights: Vec<WeightEdit>,

    /// Maze to carve before searching: recursive-division, randomized-prims or binary-tree.
    /// Without it the search runs on an open grid.
    #[arg(long)]
    pub maze: Option<Generator>,

    /// Search algorithm: bfs, dfs, dijkstra or astar.
    #[arg(long, default_value = "astar")]
    pub solver: Solver,

    /// Search replay speed.
    #[arg(long, value_enum, default_value_t = Speed::Medium)]
    pub speed: Speed,

    /// Seed for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,

    /// File that receives the log output.
    #[arg(long, default_value = "pathtrace.log")]
    pub log_file: PathBuf,

    /// Maximum log level: trace, debug, info, warn or error.
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

/// A `--weight` edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightEdit {
    pub position: Position,
    pub weight: u32,
}

/// Parses `ROW,COL`.
fn parse_position(s: &str) -> Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {:?}", s))?;
    let row = row
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid row {:?}: {}", row, e))?;
    let col = col
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid column {:?}: {}", col, e))?;
    Ok(Position::new(row, col))
}

/// Parses `ROW,COL,WEIGHT`.
fn parse_weight_edit(s: &str) -> Result<WeightEdit, String> {
    let (position, weight) = s
        .rsplit_once(',')
        .ok_or_else(|| format!("expected ROW,COL,WEIGHT, got {:?}", s))?;
    let weight = weight
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid weight {:?}: {}", weight, e))?;
    Ok(WeightEdit {
        position: parse_position(position)?,
        weight,
    })
}
