//! Plain-text rendering for the console front-end.

use crate::game::{CellView, Position, RoundSnapshot};
use crate::leaderboard::LeaderboardEntry;

const CELL_WIDTH: usize = 3;

fn glyph(cell: CellView) -> String {
    match cell {
        CellView::Head => "@".to_string(),
        CellView::Body => "o".to_string(),
        CellView::Bomb => "X".to_string(),
        CellView::Food => "*".to_string(),
        CellView::Hint(n) => n.to_string(),
        CellView::Empty => " ".to_string(),
    }
}

fn rule(left: char, mid: char, right: char, width: usize) -> String {
    let segment = "═".repeat(CELL_WIDTH);
    let mut line = String::new();
    line.push(left);
    line.push_str(&vec![segment; width].join(&mid.to_string()));
    line.push(right);
    line
}

/// Draw the board as a box-drawn grid, one line per text row
pub fn render_board(snapshot: &RoundSnapshot) -> String {
    let width = snapshot.board_width;
    let mut out = Vec::with_capacity(snapshot.board_height * 2 + 1);

    out.push(rule('╔', '╦', '╗', width));
    for y in 0..snapshot.board_height {
        let mut line = String::from("║");
        for x in 0..width {
            let cell = snapshot.cell_at(Position::new(x as i32, y as i32));
            line.push_str(&format!("{:^w$}║", glyph(cell), w = CELL_WIDTH));
        }
        out.push(line);
        if y + 1 != snapshot.board_height {
            out.push(rule('╠', '╬', '╣', width));
        }
    }
    out.push(rule('╚', '╩', '╝', width));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Ranked leaderboard lines
pub fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return " (no scores yet)\n".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!(" {:>2}. {:<20} {} pts\n", i + 1, entry.name, entry.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameState, Snake};
    use std::collections::HashSet;

    fn snapshot() -> RoundSnapshot {
        let snake = Snake::from_cells([Position::new(0, 0), Position::new(1, 0)]).unwrap();
        let food: HashSet<Position> = [Position::new(1, 1)].into_iter().collect();
        let bombs: HashSet<Position> = [Position::new(0, 1)].into_iter().collect();
        let state = GameState::new(snake, food, bombs, 2, 2);
        RoundSnapshot::capture(&state)
    }

    #[test]
    fn test_render_board() {
        let board = render_board(&snapshot());
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "╔═══╦═══╗");
        assert_eq!(lines[1], "║ @ ║ o ║");
        assert_eq!(lines[2], "╠═══╬═══╣");
        // the bomb is hidden, the hint below the head counts it
        assert_eq!(lines[3], "║ 1 ║ * ║");
        assert_eq!(lines[4], "╚═══╩═══╝");
    }

    #[test]
    fn test_practice_reveals_bombs() {
        let mut snapshot = snapshot();
        snapshot.bombs = Some(vec![Position::new(0, 1)]);
        let board = render_board(&snapshot);
        assert!(board.lines().nth(3).unwrap().contains('X'));
    }

    #[test]
    fn test_format_leaderboard() {
        assert_eq!(format_leaderboard(&[]), " (no scores yet)\n");

        let text = format_leaderboard(&[
            LeaderboardEntry::new("Bob", 50),
            LeaderboardEntry::new("Ann", 30),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("  1. {:<20} 50 pts", "Bob"));
        assert_eq!(lines[1], format!("  2. {:<20} 30 pts", "Ann"));
    }
}
