use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{CellView, Position, RoundSnapshot};
use crate::leaderboard::LeaderboardEntry;
use crate::metrics::GameMetrics;

/// Modal content drawn over the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    None,
    /// Name prompt with the text typed so far
    NameEntry(&'a str),
    /// Full leaderboard screen
    Leaderboard,
}

/// Everything drawn in one frame
pub struct Screen<'a> {
    pub snapshot: &'a RoundSnapshot,
    pub metrics: &'a GameMetrics,
    /// Best scores, best first
    pub top_scores: &'a [LeaderboardEntry],
    pub overlay: Overlay<'a>,
    /// Transient status line, e.g. a refused undo
    pub message: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &Screen<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and sidebar
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(screen), chunks[0]);

        if screen.overlay == Overlay::Leaderboard {
            frame.render_widget(self.render_leaderboard(screen.top_scores), chunks[1]);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(chunks[1]);

            frame.render_widget(self.render_grid(screen.snapshot), body[0]);
            frame.render_widget(self.render_sidebar(screen.top_scores), body[1]);

            if !screen.snapshot.is_active() {
                let area = centered(body[0], 44, 9);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(screen), area);
            }
        }

        frame.render_widget(self.render_footer(screen.message), chunks[2]);
    }

    fn render_grid(&self, snapshot: &RoundSnapshot) -> Paragraph<'static> {
        let mut lines = Vec::with_capacity(snapshot.board_height);

        for y in 0..snapshot.board_height {
            let spans: Vec<Span> = (0..snapshot.board_width)
                .map(|x| {
                    let cell = snapshot.cell_at(Position::new(x as i32, y as i32));
                    cell_span(cell)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let title = if snapshot.practice {
            " SnakeSweeper (practice) "
        } else {
            " SnakeSweeper "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, screen: &Screen<'_>) -> Paragraph<'static> {
        let snapshot = screen.snapshot;
        let score = if snapshot.practice {
            "-".to_string()
        } else {
            snapshot.score.to_string()
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                score,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Undos: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.remaining_undos.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.snake.len().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(screen.metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                screen.metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Rounds: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                screen.metrics.rounds_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_sidebar(&self, top_scores: &[LeaderboardEntry]) -> Paragraph<'static> {
        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!(" {k:<6}"), Style::default().fg(Color::Cyan)),
                Span::raw(what),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                " Controls",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            key("WASD", "move"),
            key("Z", "undo"),
            key("R", "restart"),
            key("L", "leaderboard"),
            key("Q", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                " Top 3 Scores",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ];

        if top_scores.is_empty() {
            lines.push(Line::from(Span::styled(
                " No scores yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, entry) in top_scores.iter().take(3).enumerate() {
            lines.push(Line::from(format!(
                " {}. {:<12} {}",
                i + 1,
                truncate(&entry.name, 12),
                entry.score
            )));
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL))
    }

    fn render_leaderboard(&self, top_scores: &[LeaderboardEntry]) -> Paragraph<'static> {
        let mut lines = vec![Line::from("")];

        if top_scores.is_empty() {
            lines.push(Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, entry) in top_scores.iter().take(10).enumerate() {
            let style = match i {
                0 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                1 | 2 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::Gray),
            };
            lines.push(Line::from(Span::styled(
                format!("{:>2}. {:<20} {:>6}", i + 1, truncate(&entry.name, 20), entry.score),
                style,
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press L to return",
            Style::default().fg(Color::Gray),
        )));

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Leaderboard "),
        )
    }

    fn render_game_over(&self, screen: &Screen<'_>) -> Paragraph<'static> {
        let snapshot = screen.snapshot;
        let reason = snapshot
            .end_reason()
            .map(|r| r.message())
            .unwrap_or_default();

        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(reason),
            Line::from(""),
        ];

        if snapshot.practice {
            text.push(Line::from(Span::styled(
                "Have fun playing the real game!",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        text.push(Line::from(""));

        if let Overlay::NameEntry(name) = screen.overlay {
            text.push(Line::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{name}_"),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]));
            text.push(Line::from(Span::styled(
                "Enter to save, Esc to skip",
                Style::default().fg(Color::Gray),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_footer(&self, message: Option<&str>) -> Paragraph<'static> {
        let line = match message {
            Some(message) => Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Magenta),
            )),
            None => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Z", Style::default().fg(Color::Cyan)),
                Span::raw(" to undo | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(cell: CellView) -> Span<'static> {
    match cell {
        CellView::Head => Span::styled(
            "@ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        CellView::Body => Span::styled("■ ", Style::default().fg(Color::Green)),
        CellView::Bomb => Span::styled(
            "X ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        CellView::Food => Span::styled(
            "* ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        CellView::Hint(n) => Span::styled(format!("{n} "), Style::default().fg(hint_color(n))),
        CellView::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

fn hint_color(count: u8) -> Color {
    match count {
        0 => Color::DarkGray,
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        _ => Color::Magenta,
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
