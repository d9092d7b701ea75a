use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use thiserror::Error;

use crate::{
    animation::{AlgorithmResult, AnimationStep},
    app::settings::{AppMode, Speed},
    generators::{Generator, generate_maze},
    grid::{Grid, Position},
    rng::RandomSource,
    solvers::{Solver, search},
};

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOutcome {
    pub status: PlaybackStatus,
    /// Number of steps applied to the grid before the replay ended
    pub steps_applied: usize,
}

/// Replays steps onto a grid in fixed-size batches with a pause between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub batch_size: usize,
    pub delay: Duration,
}

impl Playback {
    /// Maze replays always run at the same pace.
    pub const MAZE: Playback = Playback {
        batch_size: 2,
        delay: Duration::from_millis(30),
    };
    /// Number of search steps applied per frame
    pub const SEARCH_BATCH_SIZE: usize = 5;

    pub fn search(speed: Speed) -> Self {
        Playback {
            batch_size: Self::SEARCH_BATCH_SIZE,
            delay: speed.delay(),
        }
    }

    /// Applies `steps` to `grid` batch by batch.
    ///
    /// After every batch `on_batch` receives the grid and the positions that changed. The cancel
    /// flag is checked before each batch, so a cancelled replay stops after the batch in flight.
    /// There is no pause after the last batch.
    pub fn play<F>(
        &self,
        grid: &mut Grid,
        steps: &[AnimationStep],
        cancel: &AtomicBool,
        mut on_batch: F,
    ) -> std::io::Result<PlaybackOutcome>
    where
        F: FnMut(&Grid, &[Position]) -> std::io::Result<()>,
    {
        let batch_size = self.batch_size.max(1);
        let mut steps_applied = 0;
        for batch in steps.chunks(batch_size) {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(
                    "Playback cancelled after {} of {} steps",
                    steps_applied,
                    steps.len()
                );
                return Ok(PlaybackOutcome {
                    status: PlaybackStatus::Cancelled,
                    steps_applied,
                });
            }

            let changed = batch
                .iter()
                .flat_map(|step| grid.apply_step(step))
                .collect::<Vec<_>>();
            steps_applied += batch.len();
            on_batch(grid, &changed)?;

            if steps_applied < steps.len() && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }
        Ok(PlaybackOutcome {
            status: PlaybackStatus::Completed,
            steps_applied,
        })
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Another run holds the grid.
    #[error("Session is busy ({0})")]
    Busy(AppMode),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<SessionError> for std::io::Error {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Io(e) => e,
            busy => std::io::Error::other(busy),
        }
    }
}

/// A live grid plus the mode guarding it.
pub struct Session {
    grid: Grid,
    mode: AppMode,
}

impl Session {
    pub fn new(grid: Grid) -> Self {
        Session {
            grid,
            mode: AppMode::Idle,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Claims the session for a run. Fails if a run is already in progress.
    pub fn begin(&mut self, mode: AppMode) -> Result<(), SessionError> {
        if self.mode != AppMode::Idle {
            tracing::warn!("Refusing to start {} while {}", mode, self.mode);
            return Err(SessionError::Busy(self.mode));
        }
        self.mode = mode;
        Ok(())
    }

    /// Releases the session.
    pub fn end(&mut self) {
        self.mode = AppMode::Idle;
    }

    /// Grid access for user edits, refused while a run holds the session.
    pub fn grid_mut(&mut self) -> Result<&mut Grid, SessionError> {
        match self.mode {
            AppMode::Idle => Ok(&mut self.grid),
            mode => Err(SessionError::Busy(mode)),
        }
    }

    /// Resets the grid, then generates a maze and replays it with [`Playback::MAZE`].
    pub fn run_maze<F>(
        &mut self,
        generator: Generator,
        rng: &mut impl RandomSource,
        cancel: &AtomicBool,
        on_batch: F,
    ) -> Result<PlaybackOutcome, SessionError>
    where
        F: FnMut(&Grid, &[Position]) -> std::io::Result<()>,
    {
        self.begin(AppMode::GeneratingMaze)?;
        self.grid.reset();
        let steps = generate_maze(generator, &self.grid, rng);
        if steps.is_empty() {
            tracing::warn!("{} produced no steps", generator.key());
        }
        let outcome = Playback::MAZE.play(&mut self.grid, &steps, cancel, on_batch);
        self.end();
        Ok(outcome?)
    }

    /// Clears the previous search trace, then runs `solver` and replays its steps.
    pub fn run_search<F>(
        &mut self,
        solver: Solver,
        speed: Speed,
        cancel: &AtomicBool,
        on_batch: F,
    ) -> Result<(AlgorithmResult, PlaybackOutcome), SessionError>
    where
        F: FnMut(&Grid, &[Position]) -> std::io::Result<()>,
    {
        self.begin(AppMode::RunningAlgorithm)?;
        self.grid.clear_path();
        let result = search(solver, &self.grid, self.grid.start(), self.grid.end());
        let outcome =
            Playback::search(speed).play(&mut self.grid, &result.steps, cancel, on_batch);
        self.end();
        Ok((result, outcome?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{animation::Phase, grid::CellState, rng::get_rng};

    const INSTANT: Playback = Playback {
        batch_size: 3,
        delay: Duration::ZERO,
    };

    fn visit_steps(count: u16) -> Vec<AnimationStep> {
        (0..count)
            .map(|col| {
                AnimationStep::single(Position::new(1, col), CellState::Visited, Phase::Search)
            })
            .collect()
    }

    #[test]
    fn test_play_in_batches() {
        let mut grid = Grid::new(3, 8, Position::new(0, 0), Position::new(2, 7));
        let steps = visit_steps(8);
        let cancel = AtomicBool::new(false);
        let mut batches = Vec::new();
        let outcome = INSTANT
            .play(&mut grid, &steps, &cancel, |_, changed| {
                batches.push(changed.len());
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome.status, PlaybackStatus::Completed);
        assert_eq!(outcome.steps_applied, 8);
        assert_eq!(batches, vec![3, 3, 2]);
        assert!((0..8).all(|col| grid[Position::new(1, col)].state == CellState::Visited));
    }

    #[test]
    fn test_cancel_stops_after_current_batch() {
        let mut grid = Grid::new(3, 8, Position::new(0, 0), Position::new(2, 7));
        let steps = visit_steps(8);
        let cancel = AtomicBool::new(false);
        let outcome = INSTANT
            .play(&mut grid, &steps, &cancel, |_, _| {
                cancel.store(true, Ordering::Relaxed);
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome.status, PlaybackStatus::Cancelled);
        assert_eq!(outcome.steps_applied, 3);
        assert_eq!(grid[Position::new(1, 3)].state, CellState::Empty);
    }

    #[test]
    fn test_session_error_wraps_io() {
        let err = SessionError::from(std::io::Error::other("terminal gone"));
        assert!(matches!(err, SessionError::Io(_)));
        assert_eq!(err.to_string(), "terminal gone");
        let io: std::io::Error = err.into();
        assert_eq!(io.to_string(), "terminal gone");
    }

    #[test]
    fn test_batch_errors_propagate() {
        let mut grid = Grid::new(3, 8, Position::new(0, 0), Position::new(2, 7));
        let cancel = AtomicBool::new(false);
        let result = INSTANT.play(&mut grid, &visit_steps(4), &cancel, |_, _| {
            Err(std::io::Error::other("terminal gone"))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_session_refuses_concurrent_runs() {
        let mut session = Session::new(Grid::with_default_endpoints(7, 7));
        let cancel = AtomicBool::new(false);
        session.begin(AppMode::GeneratingMaze).unwrap();
        assert!(session.grid_mut().is_err());
        let busy = session.run_search(Solver::Bfs, Speed::Fast, &cancel, |_, _| Ok(()));
        assert!(matches!(busy, Err(SessionError::Busy(AppMode::GeneratingMaze))));
        if let Err(e) = busy {
            assert_eq!(e.to_string(), "Session is busy (generating-maze)");
            let io: std::io::Error = e.into();
            assert_eq!(io.kind(), std::io::ErrorKind::Other);
        }
        session.end();
        assert_eq!(session.mode(), AppMode::Idle);
        assert!(session.grid_mut().is_ok());
    }

    #[test]
    fn test_session_maze_then_search() {
        let mut session = Session::new(Grid::with_default_endpoints(9, 9));
        let cancel = AtomicBool::new(false);
        session.grid_mut().unwrap().set_weight(Position::new(3, 3), 5);

        let outcome = session
            .run_maze(Generator::Prim, &mut get_rng(Some(1)), &cancel, |_, _| Ok(()))
            .unwrap();
        assert_eq!(outcome.status, PlaybackStatus::Completed);
        assert_eq!(session.mode(), AppMode::Idle);
        // Maze generation starts from a reset grid
        assert_eq!(session.grid()[Position::new(3, 3)].weight, 1);

        let mut batches = 0;
        let (result, outcome) = session
            .run_search(Solver::AStar, Speed::Fast, &cancel, |_, _| {
                batches += 1;
                Ok(())
            })
            .unwrap();
        assert!(result.reached_end);
        assert_eq!(outcome.steps_applied, result.steps.len());
        assert_eq!(batches, result.steps.len().div_ceil(Playback::SEARCH_BATCH_SIZE));
        assert_eq!(
            session
                .grid()
                .cells()
                .filter(|(_, cell)| cell.state == CellState::Path)
                .count(),
            result.stats.path_length
        );
    }

    #[test]
    fn test_session_search_clears_previous_trace() {
        let mut session = Session::new(Grid::new(1, 6, Position::new(0, 0), Position::new(0, 5)));
        let cancel = AtomicBool::new(false);
        // Cancel before anything is applied so the tests never sleep
        cancel.store(true, Ordering::Relaxed);
        let trace = AnimationStep::single(Position::new(0, 2), CellState::Path, Phase::Path);
        session.grid_mut().unwrap().apply_step(&trace);
        let (result, outcome) = session
            .run_search(Solver::Dfs, Speed::Fast, &cancel, |_, _| Ok(()))
            .unwrap();
        assert_eq!(outcome.status, PlaybackStatus::Cancelled);
        assert_eq!(outcome.steps_applied, 0);
        assert_eq!(result.stats.path_length, 4);
        assert_eq!(session.grid()[Position::new(0, 2)].state, CellState::Empty);
        assert_eq!(session.mode(), AppMode::Idle);
    }
}
