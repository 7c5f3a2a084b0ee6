use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Direction, GameState, GameStatus, Position};

/// Session values shown alongside the board
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub best_score: u32,
    pub speed: u16,
}

const HEAD_COLOR: Color = Color::Rgb(76, 175, 80);
const FOOD_COLOR: Color = Color::Rgb(255, 82, 82);
const RECORD_COLOR: Color = Color::Rgb(255, 215, 0);
const BACKGROUND: Color = Color::Rgb(34, 34, 34);

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &Hud) {
        let [header, center, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(self.render_header(state, hud), header);

        // Center the board horizontally
        let [_, board, _] = Layout::horizontal([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .areas(center);

        // The terminal overlay replaces the board once the run is over;
        // every other phase shows the board itself.
        if state.status == GameStatus::Over {
            frame.render_widget(self.render_game_over(state, hud), board);
        } else {
            frame.render_widget(self.render_grid(state), board);
        }

        frame.render_widget(self.render_controls(), footer);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..state.grid_size {
            let mut spans = Vec::new();

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        head_glyph(state.snake.direction),
                        Style::default()
                            .fg(HEAD_COLOR)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(index) = state.snake.body.iter().position(|&p| p == pos) {
                    // Body shades darker towards the tail, clamped at a
                    // floor so the end stays visible.
                    let green = (150 - 3 * index as i32).max(100) as u8;
                    Span::styled("■ ", Style::default().fg(Color::Rgb(0, green, 0)))
                } else if pos == state.food {
                    Span::styled(
                        "● ",
                        Style::default()
                            .fg(FOOD_COLOR)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = match state.status {
            GameStatus::Idle => " Snake (press an arrow key or Enter to start) ",
            GameStatus::Paused => " Snake (paused) ",
            _ => " Snake ",
        };

        Paragraph::new(lines)
            .style(Style::default().bg(BACKGROUND))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_header(&self, state: &GameState, hud: &Hud) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(hud.speed.to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, hud: &Hud) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if state.score >= hud.best_score {
            text.push(Line::from(""));
            text.push(Line::from(vec![Span::styled(
                "NEW RECORD!",
                Style::default()
                    .fg(RECORD_COLOR)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw("/"),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" move | "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" start | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" restart | "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The head shows which way the snake is looking; an idle snake has no
/// heading yet.
fn head_glyph(direction: Option<Direction>) -> &'static str {
    match direction {
        Some(Direction::Up) => "▲ ",
        Some(Direction::Down) => "▼ ",
        Some(Direction::Left) => "◀ ",
        Some(Direction::Right) => "▶ ",
        None => "■ ",
    }
}
