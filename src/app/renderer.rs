use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::grid::{Cell, CellState, Grid, Position};

/// The width of each cell when rendered, in character widths.
pub const CELL_WIDTH: u16 = 2;

/// Styled two-column glyph for a cell.
pub fn glyph(cell: &Cell) -> StyledContent<String> {
    let styled = match cell.state {
        CellState::Empty => match cell.weight {
            0 | 1 => "  ".to_string().with(Color::Reset),
            w @ 2..=9 => format!("{} ", w).with(Color::DarkYellow),
            _ => "9+".to_string().with(Color::DarkYellow),
        },
        CellState::Wall => "⬜".to_string().with(Color::White),
        CellState::Start => "🟩".to_string().with(Color::Green),
        CellState::End => "🟥".to_string().with(Color::Red),
        CellState::Frontier => "o ".to_string().with(Color::Cyan),
        CellState::Visited => "* ".to_string().with(Color::Blue),
        CellState::Path => "🟨".to_string().with(Color::Yellow),
    };

    #[cfg(debug_assertions)]
    {
        use unicode_width::UnicodeWidthStr;
        assert_eq!(
            styled.content().width(),
            CELL_WIDTH as usize,
            "Each cell must occupy exactly two character widths."
        );
    }

    styled
}

/// Draws the grid and a status line below it.
pub struct Renderer {
    stdout: Stdout,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
        }
    }

    /// Whether the terminal is large enough for the grid plus the status line.
    pub fn fits(grid: &Grid) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        Ok(u32::from(term_width) >= u32::from(grid.cols()) * u32::from(CELL_WIDTH)
            && u32::from(term_height) > u32::from(grid.rows()))
    }

    /// Tell the user the terminal is too small for the grid.
    pub fn draw_too_small(&mut self, grid: &Grid) -> std::io::Result<()> {
        let msg = format!(
            "Terminal size is too small for the grid dimensions ({}x{}), at least {}x{} is needed. Please resize the terminal.\r\n",
            grid.rows(),
            grid.cols(),
            u32::from(grid.cols()) * u32::from(CELL_WIDTH),
            u32::from(grid.rows()) + 1
        );
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        self.stdout.flush()
    }

    /// Redraw the whole grid from scratch.
    pub fn draw_grid(&mut self, grid: &Grid) -> std::io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for row in 0..grid.rows() {
            self.stdout.queue(cursor::MoveTo(0, row))?;
            for col in 0..grid.cols() {
                self.stdout
                    .queue(style::PrintStyledContent(glyph(&grid[Position::new(row, col)])))?;
            }
        }
        self.stdout.flush()
    }

    /// Redraw only the given cells.
    pub fn draw_cells(&mut self, grid: &Grid, positions: &[Position]) -> std::io::Result<()> {
        for &pos in positions {
            let Some(cell) = grid.get(pos) else {
                continue;
            };
            queue!(
                self.stdout,
                cursor::MoveTo(pos.col * CELL_WIDTH, pos.row),
                style::PrintStyledContent(glyph(cell))
            )?;
        }
        self.stdout.flush()
    }

    /// Replace the status line under the grid, cut to the terminal width.
    pub fn draw_status(&mut self, grid: &Grid, text: &str, color: Color) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (line, _) = text.unicode_truncate(term_width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(0, grid.rows()),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(line.with(color).attribute(Attribute::Bold))
        )?;
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_glyph_is_two_columns() {
        use unicode_width::UnicodeWidthStr;
        let states = [
            CellState::Empty,
            CellState::Wall,
            CellState::Start,
            CellState::End,
            CellState::Frontier,
            CellState::Visited,
            CellState::Path,
        ];
        for state in states {
            for weight in [1, 4, 12] {
                let styled = glyph(&Cell { state, weight });
                assert_eq!(styled.content().width(), CELL_WIDTH as usize, "{}", state);
            }
        }
    }

    #[test]
    fn test_weight_glyphs() {
        let weighted = |weight| {
            glyph(&Cell {
                state: CellState::Empty,
                weight,
            })
            .content()
            .clone()
        };
        assert_eq!(weighted(1), "  ");
        assert_eq!(weighted(7), "7 ");
        assert_eq!(weighted(40), "9+");
    }
}
