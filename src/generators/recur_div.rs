use super::{StepBuilder, at};
use crate::{
    animation::AnimationStep,
    grid::{CellState, Grid},
    rng::RandomSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

/// Inclusive rectangle of grid cells still to be divided.
#[derive(Debug, Clone, Copy)]
struct Region {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

impl Region {
    fn height(&self) -> usize {
        (self.bottom + 1).saturating_sub(self.top)
    }

    fn width(&self) -> usize {
        (self.right + 1).saturating_sub(self.left)
    }
}

/// Requires the grid to be at least 3x3.
pub(super) fn recursive_division(grid: &Grid, rng: &mut impl RandomSource) -> Vec<AnimationStep> {
    let rows = grid.rows() as usize;
    let cols = grid.cols() as usize;
    if rows < 3 || cols < 3 {
        return Vec::new();
    }

    let mut steps = Vec::new();

    // Wall off the border and open the whole interior
    let mut frame = StepBuilder::new(grid);
    for (pos, _) in grid.cells() {
        let (row, col) = (pos.row as usize, pos.col as usize);
        let on_border = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
        let state = if on_border {
            CellState::Wall
        } else {
            CellState::Empty
        };
        frame.set(pos, state);
    }
    steps.extend(frame.build());

    // Start the recursive division
    divide(
        grid,
        Region {
            top: 1,
            bottom: rows - 2,
            left: 1,
            right: cols - 2,
        },
        rng,
        &mut steps,
    );
    steps
}

/// Splits `region` with one wall line (one step) and recurses into both halves.
fn divide(grid: &Grid, region: Region, rng: &mut impl RandomSource, steps: &mut Vec<AnimationStep>) {
    let (height, width) = (region.height(), region.width());
    if width < 2 || height < 2 {
        return;
    }

    let orientation = match width.cmp(&height) {
        std::cmp::Ordering::Less => Orientation::Horizontal,
        std::cmp::Ordering::Greater => Orientation::Vertical,
        std::cmp::Ordering::Equal => {
            if rng.coin() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
    };

    let Region {
        top,
        bottom,
        left,
        right,
    } = region;
    let mut wall = StepBuilder::new(grid);
    match orientation {
        Orientation::Horizontal => {
            // Walls sit on even rows strictly inside the region, passages on odd columns. Keeping
            // the wall off the region's edge means it can never block a hole in a bordering wall.
            let Some(wall_row) = random_even(top + 1, bottom - 1, rng) else {
                return;
            };
            let hole_col = random_odd(left, right, rng);

            // The line reaches one cell past the region to meet the surrounding walls
            (left - 1..=right + 1)
                .filter(|&col| Some(col) != hole_col)
                .for_each(|col| wall.set(at(wall_row, col), CellState::Wall));
            steps.extend(wall.build());

            // Recursively divide the regions above and below the wall
            divide(
                grid,
                Region {
                    bottom: wall_row - 1,
                    ..region
                },
                rng,
                steps,
            );
            divide(
                grid,
                Region {
                    top: wall_row + 1,
                    ..region
                },
                rng,
                steps,
            );
        }
        Orientation::Vertical => {
            let Some(wall_col) = random_even(left + 1, right - 1, rng) else {
                return;
            };
            let hole_row = random_odd(top, bottom, rng);

            (top - 1..=bottom + 1)
                .filter(|&row| Some(row) != hole_row)
                .for_each(|row| wall.set(at(row, wall_col), CellState::Wall));
            steps.extend(wall.build());

            // Recursively divide the regions left and right of the wall
            divide(
                grid,
                Region {
                    right: wall_col - 1,
                    ..region
                },
                rng,
                steps,
            );
            divide(
                grid,
                Region {
                    left: wall_col + 1,
                    ..region
                },
                rng,
                steps,
            );
        }
    }
}

/// Uniformly random even number in `min..=max`, if there is one.
fn random_even(min: usize, max: usize, rng: &mut impl RandomSource) -> Option<usize> {
    random_with_parity(min, max, 0, rng)
}

/// Uniformly random odd number in `min..=max`, if there is one.
fn random_odd(min: usize, max: usize, rng: &mut impl RandomSource) -> Option<usize> {
    random_with_parity(min, max, 1, rng)
}

fn random_with_parity(
    min: usize,
    max: usize,
    parity: usize,
    rng: &mut impl RandomSource,
) -> Option<usize> {
    let low = if min % 2 == parity { min } else { min + 1 };
    let high = if max % 2 == parity {
        max
    } else {
        max.checked_sub(1)?
    };
    if low > high {
        return None;
    }
    let choices = (high - low) / 2 + 1;
    Some(low + rng.index(choices) * 2)
}
