use std::time::{Duration, Instant};

use pathtrace::{
    generators::{Generator, generate_maze},
    grid::Grid,
    rng::get_rng,
    solvers::{Solver, search},
};

/// Grid size used for profiling, large enough to make the algorithms show up in a profiler
const ROWS: u16 = 255;
const COLS: u16 = 511;

fn average(total: Duration, iterations: usize) -> Duration {
    total / iterations.max(1) as u32
}

fn main() {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let iterations = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);

    let empty = Grid::with_default_endpoints(ROWS, COLS);
    let mut rng = get_rng(Some(0));
    println!("{}x{} grid, {} iteration(s)", ROWS, COLS, iterations);

    let mut maze = empty.clone();
    for generator in Generator::ALL {
        let mut total = Duration::ZERO;
        let mut steps = Vec::new();
        for _ in 0..iterations {
            let started = Instant::now();
            steps = generate_maze(generator, &empty, &mut rng);
            total += started.elapsed();
        }
        println!(
            "{:<30} {:>8} steps {:>12?}",
            generator.to_string(),
            steps.len(),
            average(total, iterations)
        );
        if generator == Generator::RecurDiv {
            steps.iter().for_each(|step| {
                maze.apply_step(step);
            });
        }
    }

    // Solvers run on the recursive division maze, which leaves plenty of open space to explore
    for solver in Solver::ALL {
        let mut total = Duration::ZERO;
        let mut visited_nodes = 0;
        for _ in 0..iterations {
            let result = search(solver, &maze, maze.start(), maze.end());
            total += result.stats.execution_time;
            visited_nodes = result.stats.visited_nodes;
        }
        println!(
            "{:<30} {:>8} nodes {:>12?}",
            solver.to_string(),
            visited_nodes,
            average(total, iterations)
        );
    }
}
