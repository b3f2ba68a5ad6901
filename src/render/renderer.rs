use std::io::{stderr, Stderr};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};

use super::pacer::{FixedDelay, Pacer};
use super::{RenderFrame, Renderer};
use crate::game::{Cell, Position, SimError};
use crate::input::{InputHandler, KeyAction};

const SNAKE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
];

/// Terminal renderer drawing the arena with ratatui
pub struct TuiRenderer<P: Pacer = FixedDelay> {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    input_handler: InputHandler,
    pacer: P,
    paced: bool,
    restored: bool,
}

impl<P: Pacer> TuiRenderer<P> {
    /// Switch the terminal to raw mode on the alternate screen
    pub fn new(pacer: P) -> Result<Self, SimError> {
        enable_raw_mode()?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            input_handler: InputHandler::new(),
            pacer,
            paced: true,
            restored: false,
        })
    }

    /// Drain pending key presses; true when one of them asked to quit
    fn poll_input(&mut self) -> Result<bool, SimError> {
        let mut stop = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match self.input_handler.handle_key_event(key) {
                    KeyAction::Quit => stop = true,
                    KeyAction::TogglePacing => self.paced = !self.paced,
                    KeyAction::None => {}
                }
            }
        }
        Ok(stop)
    }

    fn restore(&mut self) -> Result<(), SimError> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl<P: Pacer> Renderer for TuiRenderer<P> {
    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<bool, SimError> {
        let paced = self.paced;
        self.terminal.draw(|f| draw(f, frame, paced))?;

        let stop = self.poll_input()?;
        if self.paced && !stop {
            self.pacer.pause();
        }
        Ok(stop)
    }

    fn idle(&mut self) -> Result<bool, SimError> {
        self.poll_input()
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.restore()
    }
}

impl<P: Pacer> Drop for TuiRenderer<P> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}

fn draw(f: &mut Frame, frame: &RenderFrame<'_>, paced: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Arena
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    f.render_widget(stats_line(frame), chunks[0]);

    let arena = Paragraph::new(grid_lines(frame))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake Arena "),
        )
        .alignment(Alignment::Center);
    f.render_widget(arena, chunks[1]);

    f.render_widget(controls_line(paced), chunks[2]);
}

fn stats_line(frame: &RenderFrame<'_>) -> Paragraph<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    Paragraph::new(Line::from(vec![
        Span::styled("Episode: ", label),
        Span::styled(frame.episode.to_string(), value),
        Span::raw("    "),
        Span::styled("Tick: ", label),
        Span::styled(frame.tick.to_string(), value),
        Span::raw("    "),
        Span::styled("Alive: ", label),
        Span::styled(format!("{}/{}", frame.alive, frame.players), value),
        Span::raw("    "),
        Span::styled("Max reward: ", label),
        Span::styled(frame.max_reward.to_string(), value),
        Span::raw(if frame.exploring { "    exploring" } else { "" }),
    ]))
    .alignment(Alignment::Center)
}

fn controls_line(paced: bool) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("P", Style::default().fg(Color::Cyan)),
        Span::raw(if paced { " run full speed | " } else { " slow down | " }),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ]))
    .alignment(Alignment::Center)
}

fn grid_lines(frame: &RenderFrame<'_>) -> Vec<Line<'static>> {
    let grid = frame.grid;
    (0..grid.height())
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..grid.width())
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    let cell = grid.get(pos).unwrap_or(Cell::Empty);
                    let trail = frame.ghost.get(pos).unwrap_or(Cell::Empty);
                    cell_span(cell, trail)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Glyph for a cell; `trail` is the ghost grid's content at the same spot
fn cell_span(cell: Cell, trail: Cell) -> Span<'static> {
    match (cell, trail) {
        (Cell::Snake(color), _) => Span::styled(
            "■ ",
            Style::default()
                .fg(snake_color(color))
                .add_modifier(Modifier::BOLD),
        ),
        (Cell::Food, _) => Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        (Cell::Empty, Cell::Snake(color)) => Span::styled(
            "□ ",
            Style::default()
                .fg(snake_color(color))
                .add_modifier(Modifier::DIM),
        ),
        (Cell::Empty, _) => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

/// Colors are 2, 4, 6, ... so halve them to index the palette
fn snake_color(color: u8) -> Color {
    let slot = (color as usize / 2).saturating_sub(1);
    SNAKE_COLORS[slot % SNAKE_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;

    #[test]
    fn test_snake_colors_are_distinct_for_first_players() {
        assert_eq!(snake_color(2), Color::Cyan);
        assert_eq!(snake_color(4), Color::Green);
        assert_ne!(snake_color(6), snake_color(8));
        assert_eq!(snake_color(14), Color::Cyan);
    }

    #[test]
    fn test_cell_glyphs() {
        assert_eq!(cell_span(Cell::Food, Cell::Empty).content, "O ");
        assert_eq!(cell_span(Cell::Snake(2), Cell::Snake(2)).content, "■ ");
        assert_eq!(cell_span(Cell::Empty, Cell::Snake(2)).content, "□ ");
        assert_eq!(cell_span(Cell::Empty, Cell::Empty).content, ". ");
    }

    #[test]
    fn test_grid_lines_shape() {
        let grid = Grid::new(7, 4);
        let ghost = Grid::new(7, 4);
        let frame = RenderFrame {
            grid: &grid,
            ghost: &ghost,
            episode: 200,
            tick: 3,
            alive: 2,
            players: 4,
            max_reward: 1,
            exploring: true,
        };

        let lines = grid_lines(&frame);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.spans.len() == 7));
    }
}
