pub mod playback;
pub mod renderer;
pub mod settings;

use std::{
    io::{Stdout, Write},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    style::Color,
    terminal::{self, ClearType},
};

use crate::{
    animation::AlgorithmResult,
    app::{
        playback::{PlaybackStatus, Session},
        renderer::Renderer,
        settings::Args,
    },
    grid::{Grid, Position},
    rng::get_rng,
};

/// Terminal front end: replays an optional maze, then a search, on a single grid.
pub struct App {
    settings: Args,
}

impl App {
    /// How often the input thread checks the stop flags
    const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn new(settings: Args) -> Self {
        Self { settings }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop. Returns once the user presses Esc.
    pub fn run(&self) -> std::io::Result<()> {
        let grid = self.load_grid()?;
        tracing::info!(
            "Starting with a {}x{} grid, maze {:?}, solver {}, seed {:?}",
            grid.rows(),
            grid.cols(),
            self.settings.maze.map(|generator| generator.key()),
            self.settings.solver.key(),
            self.settings.seed
        );

        // Set by the input thread when Esc is pressed
        let cancel = AtomicBool::new(false);
        // Set by the input thread when the terminal is resized, cleared by the next redraw
        let resized = AtomicBool::new(false);
        // Set by the main thread to tell the input thread to exit
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let input = scope.spawn(|| App::listen_to_user_input(&cancel, &resized, &done));

            let result = self.animate(grid, &cancel, &resized);
            if result.is_ok() {
                // Keep the final picture up until the user leaves
                while !cancel.load(Ordering::Relaxed) && !input.is_finished() {
                    std::thread::sleep(App::INPUT_POLL_TIMEOUT);
                }
            }
            done.store(true, Ordering::Relaxed);

            let input_result = input
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("Input thread panicked")));
            result.and(input_result)
        })
    }

    /// The layout file given with `--grid`, or an open grid of the configured size.
    fn load_grid(&self) -> std::io::Result<Grid> {
        let Some(path) = &self.settings.grid else {
            return Ok(Grid::with_default_endpoints(
                self.settings.rows,
                self.settings.cols,
            ));
        };
        let layout = std::fs::read_to_string(path)?;
        layout.parse::<Grid>().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}: {}", path.display(), e),
            )
        })
    }

    /// Applies the wall and weight edits from the command line.
    fn apply_edits(&self, grid: &mut Grid) {
        if self.settings.clear_walls {
            grid.clear_walls();
        }
        for &pos in &self.settings.walls {
            if !grid.toggle_wall(pos) {
                tracing::warn!("Cannot toggle a wall at {}", pos);
            }
        }
        for edit in &self.settings.weights {
            if !grid.set_weight(edit.position, edit.weight) {
                tracing::warn!("Cannot set a weight at {}", edit.position);
            }
        }
    }

    /// Draws the grid, replays the maze and the search, and leaves the stats on the status line.
    fn animate(
        &self,
        grid: Grid,
        cancel: &AtomicBool,
        resized: &AtomicBool,
    ) -> std::io::Result<()> {
        let mut renderer = Renderer::new();
        if !Renderer::fits(&grid)? {
            tracing::warn!("Terminal too small for a {}x{} grid", grid.rows(), grid.cols());
            return renderer.draw_too_small(&grid);
        }
        renderer.draw_grid(&grid)?;

        let mut session = Session::new(grid);
        // Redraw everything after a resize, otherwise only what changed
        let redraw = |renderer: &mut Renderer, grid: &Grid, changed: &[Position]| {
            if resized.swap(false, Ordering::Relaxed) {
                renderer.draw_grid(grid)
            } else {
                renderer.draw_cells(grid, changed)
            }
        };

        if let Some(generator) = self.settings.maze {
            renderer.draw_status(
                session.grid(),
                &format!("Generating maze: {} (Esc to cancel)", generator),
                Color::Cyan,
            )?;
            let mut rng = get_rng(self.settings.seed);
            let outcome = session.run_maze(generator, &mut rng, cancel, |grid, changed| {
                redraw(&mut renderer, grid, changed)
            })?;
            if outcome.status == PlaybackStatus::Cancelled {
                return Ok(());
            }
        }

        // Edits go on top of the maze, since generating one resets the grid
        self.apply_edits(session.grid_mut()?);
        renderer.draw_grid(session.grid())?;

        let solver = self.settings.solver;
        renderer.draw_status(
            session.grid(),
            &format!(
                "Running {}{} at {} speed (Esc to cancel)",
                solver,
                if solver.is_weighted() {
                    ""
                } else {
                    ", ignoring weights"
                },
                self.settings.speed
            ),
            Color::Cyan,
        )?;
        let (result, outcome) =
            session.run_search(solver, self.settings.speed, cancel, |grid, changed| {
                redraw(&mut renderer, grid, changed)
            })?;
        if outcome.status == PlaybackStatus::Cancelled {
            return Ok(());
        }

        let (status, color) = App::summary(&solver.to_string(), &result);
        renderer.draw_status(session.grid(), &status, color)
    }

    /// Status line text for a finished search.
    fn summary(solver: &str, result: &AlgorithmResult) -> (String, Color) {
        let stats = result.stats;
        if result.reached_end {
            (
                format!(
                    "{}: visited {} nodes, path length {}, took {:?}. Press Esc to exit...",
                    solver, stats.visited_nodes, stats.path_length, stats.execution_time
                ),
                Color::Green,
            )
        } else {
            (
                format!(
                    "{}: no path found after visiting {} nodes. Press Esc to exit...",
                    solver, stats.visited_nodes
                ),
                Color::Red,
            )
        }
    }

    /// Listen for user input events (Esc and resize)
    /// This function runs in a separate thread, and is the only place where user input is read.
    /// Esc sets the cancel flag and exits the thread.
    fn listen_to_user_input(
        cancel: &AtomicBool,
        resized: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            if done.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(App::INPUT_POLL_TIMEOUT)? {
                // No event available, continue loop to check flags again
                continue;
            }

            match event::read()? {
                event::Event::Key(key_event)
                    if key_event.kind == event::KeyEventKind::Press
                        && key_event.code == KeyCode::Esc =>
                {
                    tracing::debug!("[input loop] Esc key pressed, exiting");
                    cancel.store(true, Ordering::Relaxed);
                    return Ok(());
                }
                event::Event::Resize(_, _) => resized.store(true, Ordering::Relaxed),
                _ => {} // Ignore other events
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::{
        animation::SearchStats,
        solvers::{Solver, search},
    };

    fn app_with(args: &[&str]) -> App {
        let args = std::iter::once("pathtrace").chain(args.iter().copied());
        App::new(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_apply_edits() {
        let app = app_with(&[
            "--clear-walls",
            "--wall",
            "0,1",
            "--wall",
            "0,0",
            "--weight",
            "1,1,4",
            "--weight",
            "9,9,2",
        ]);
        let mut session = Session::new("S#.\n.#.\n..E".parse().unwrap());
        app.apply_edits(session.grid_mut().unwrap());
        // Walls cleared, then (0, 1) walled again; the start cannot be walled
        assert_eq!(session.grid().to_string(), "S#.\n.4.\n..E");

        let grid = session.grid();
        let result = search(Solver::Dijkstra, grid, grid.start(), grid.end());
        assert_eq!(result.stats.path_length, 3);
        assert!(
            result
                .path_steps()
                .all(|step| step.mutations[0].position != Position::new(1, 1))
        );
    }

    #[test]
    fn test_load_grid() {
        let app = app_with(&["--rows", "9", "--cols", "12"]);
        let grid = app.load_grid().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (9, 12));
        assert_eq!(grid.end(), Position::new(7, 9));

        let path =
            std::env::temp_dir().join(format!("pathtrace-layout-{}.txt", std::process::id()));
        std::fs::write(&path, "S..\n.3#\n..E\n").unwrap();
        let app = app_with(&["--grid", path.to_str().unwrap()]);
        let grid = app.load_grid().unwrap();
        assert_eq!(grid.to_string(), "S..\n.3#\n..E");

        std::fs::write(&path, "S..\n.x#\n..E\n").unwrap();
        let err = app.load_grid().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        std::fs::remove_file(&path).unwrap();

        assert!(app.load_grid().is_err());
    }

    #[test]
    fn test_summary() {
        let grid = Grid::new(1, 4, Position::new(0, 0), Position::new(0, 3));
        let result = search(Solver::Bfs, &grid, grid.start(), grid.end());
        let (text, color) = App::summary("BFS", &result);
        assert!(text.starts_with("BFS: visited 4 nodes, path length 2"));
        assert_eq!(color, Color::Green);

        let stuck = AlgorithmResult {
            stats: SearchStats {
                visited_nodes: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        let (text, color) = App::summary("DFS", &stuck);
        assert!(text.starts_with("DFS: no path found after visiting 3 nodes"));
        assert_eq!(color, Color::Red);
    }
}
