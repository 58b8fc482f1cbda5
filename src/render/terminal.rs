//! Terminal renderer built on ratatui and crossterm
//!
//! Draws to stderr in the alternate screen so stdout stays free for progress
//! output. `q`, `Esc` or `Ctrl+C` close the view.

use std::io::{stderr, IsTerminal, Stderr};
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

use super::Renderer;
use crate::error::RenderError;
use crate::game::{GameState, Position};
use crate::input::{InputHandler, KeyAction};

pub struct TerminalRenderer {
    title: String,
    terminal: Option<Terminal<CrosstermBackend<Stderr>>>,
    input_handler: InputHandler,
}

impl TerminalRenderer {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            terminal: None,
            input_handler: InputHandler::new(),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn init(&mut self) -> Result<(), RenderError> {
        if self.terminal.is_some() {
            return Ok(());
        }
        if !stderr().is_terminal() {
            return Err(RenderError::Unavailable(
                "stderr is not an interactive terminal".to_string(),
            ));
        }

        enable_raw_mode()?;
        let mut err = stderr();
        execute!(err, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(err))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn draw_frame(&mut self, state: &GameState) -> Result<(), RenderError> {
        let title = self.title.as_str();
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| render(frame, state, title))?;
        }
        Ok(())
    }

    fn poll_close(&mut self) -> Result<bool, RenderError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && self.input_handler.handle_key_event(key) == KeyAction::Close
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn shutdown(&mut self) {
        // Best effort: the terminal must be restored even if one call fails
        if let Some(mut terminal) = self.terminal.take() {
            let _ = disable_raw_mode();
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
            let _ = terminal.show_cursor();
        }
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn render(frame: &mut Frame, state: &GameState, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    frame.render_widget(render_stats(state), chunks[0]);
    frame.render_widget(render_grid(state, title), chunks[1]);
    frame.render_widget(render_controls(), chunks[2]);
}

fn render_grid<'a>(state: &GameState, title: &'a str) -> Paragraph<'a> {
    let head = state.snake.head();
    let mut lines = Vec::with_capacity(state.grid_height);

    for y in 0..state.grid_height {
        let mut spans = Vec::with_capacity(state.grid_width);

        for x in 0..state.grid_width {
            let pos = Position::new(x as i32, y as i32);

            let cell = if pos == head {
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else if state.snake.body.contains(&pos) {
                Span::styled("□ ", Style::default().fg(Color::Blue))
            } else if pos == state.food {
                Span::styled(
                    "● ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(". ", Style::default().fg(Color::DarkGray))
            };

            spans.push(cell);
        }

        lines.push(Line::from(spans));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {title} ")),
        )
        .alignment(Alignment::Center)
}

fn render_stats(state: &GameState) -> Paragraph<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White);

    let text = vec![Line::from(vec![
        Span::styled("len=", label),
        Span::styled(state.snake.len().to_string(), value.add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("steps=", label),
        Span::styled(state.steps.to_string(), value),
        Span::raw("  "),
        Span::styled("score=", label),
        Span::styled(state.score.to_string(), value),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn render_controls() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw("/"),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" close view, training continues"),
    ]))
    .alignment(Alignment::Center)
}
