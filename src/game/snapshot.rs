//! Read-only view of a round for front-ends.

use super::action::Direction;
use super::board::adjacent_bomb_count;
use super::state::{EndReason, GameState, Position, RoundStatus};

/// Bomb count shown on a cell next to the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub cell: Position,
    pub bombs: u8,
}

/// What occupies a cell, in drawing precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Head,
    Body,
    Bomb,
    Food,
    Hint(u8),
    Empty,
}

/// Everything a front-end needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub board_width: usize,
    pub board_height: usize,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub head: Option<Position>,
    /// Food cells, sorted
    pub food: Vec<Position>,
    /// Bomb cells, sorted; only revealed in practice mode
    pub bombs: Option<Vec<Position>>,
    pub hints: Vec<Hint>,
    pub score: u32,
    pub remaining_undos: u32,
    pub practice: bool,
    pub status: RoundStatus,
}

impl RoundSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut food: Vec<Position> = state.food.iter().copied().collect();
        food.sort();

        let bombs = state.practice.then(|| {
            let mut bombs: Vec<Position> = state.bombs.iter().copied().collect();
            bombs.sort();
            bombs
        });

        Self {
            board_width: state.board_width,
            board_height: state.board_height,
            snake: state.snake.to_sequence(),
            head: state.snake.head(),
            food,
            bombs,
            hints: head_hints(state),
            score: state.score,
            remaining_undos: state.remaining_undos,
            practice: state.practice,
            status: state.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.status {
            RoundStatus::Active => None,
            RoundStatus::Terminated(reason) => Some(reason),
        }
    }

    pub fn cell_at(&self, pos: Position) -> CellView {
        if self.head == Some(pos) {
            CellView::Head
        } else if self.snake.contains(&pos) {
            CellView::Body
        } else if self.bombs.as_ref().is_some_and(|b| b.contains(&pos)) {
            CellView::Bomb
        } else if self.food.contains(&pos) {
            CellView::Food
        } else if let Some(hint) = self.hints.iter().find(|h| h.cell == pos) {
            CellView::Hint(hint.bombs)
        } else {
            CellView::Empty
        }
    }
}

/// Bomb counts for the in-bounds orthogonal neighbours of the head that
/// hold neither snake nor food
pub fn head_hints(state: &GameState) -> Vec<Hint> {
    let Some(head) = state.snake.head() else {
        return Vec::new();
    };

    Direction::ALL
        .iter()
        .map(|dir| head.moved_in_direction(*dir))
        .filter(|cell| {
            state.is_in_bounds(*cell)
                && !state.snake.contains(*cell)
                && !state.food.contains(cell)
        })
        .map(|cell| Hint {
            cell,
            bombs: adjacent_bomb_count(cell, &state.bombs),
        })
        .collect()
}
