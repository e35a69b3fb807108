use std::collections::{HashSet, VecDeque};

use super::action::Direction;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body: an ordered deque (head at the front) mirrored by a set
/// for constant-time membership.
///
/// The set always holds exactly the cells of the deque, and no cell appears
/// twice. Every mutation is O(1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    cells: HashSet<Position>,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position) -> Self {
        let mut snake = Self::default();
        snake.push_head(head);
        snake
    }

    /// Build a snake from cells listed head first.
    ///
    /// Returns `None` if a cell is repeated.
    pub fn from_cells<I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut snake = Self::default();
        for cell in cells {
            if !snake.push_tail(cell) {
                return None;
            }
        }
        Some(snake)
    }

    /// Grow at the front. Returns false and leaves the snake untouched if
    /// the cell is already part of the body.
    pub fn push_head(&mut self, cell: Position) -> bool {
        if !self.cells.insert(cell) {
            return false;
        }
        self.body.push_front(cell);
        true
    }

    /// Re-append a cell at the back; the inverse of [`Snake::pop_tail`].
    /// Returns false if the cell is already part of the body.
    pub fn push_tail(&mut self, cell: Position) -> bool {
        if !self.cells.insert(cell) {
            return false;
        }
        self.body.push_back(cell);
        true
    }

    /// Remove and return the tail cell
    pub fn pop_tail(&mut self) -> Option<Position> {
        let tail = self.body.pop_back()?;
        self.cells.remove(&tail);
        Some(tail)
    }

    /// Remove and return the head cell
    pub fn pop_head(&mut self) -> Option<Position> {
        let head = self.body.pop_front()?;
        self.cells.remove(&head);
        Some(head)
    }

    pub fn contains(&self, cell: Position) -> bool {
        self.cells.contains(&cell)
    }

    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Body cells, head first
    pub fn to_sequence(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake moved onto a bomb
    Bomb,
    /// Player quit
    Quit,
}

impl EndReason {
    /// Short message shown to the player
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::Wall => "Hit the wall!",
            EndReason::SelfCollision => "Ate yourself!",
            EndReason::Bomb => "Hit a bomb!",
            EndReason::Quit => "You quit.",
        }
    }

    /// Whether the round ended through a collision rather than a quit
    pub fn is_collision(&self) -> bool {
        !matches!(self, EndReason::Quit)
    }
}

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Active,
    Terminated(EndReason),
}

/// What a single move changed, kept so it can be reverted exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub head: Position,
    /// Tail cell dropped by a non-eating move
    pub removed_tail: Option<Position>,
    pub ate: bool,
    pub eaten_food: Option<Position>,
    /// Food placed to replace the eaten one, if any cell was free
    pub respawned_food: Option<Position>,
}

/// Complete state of a round in progress
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: HashSet<Position>,
    pub bombs: HashSet<Position>,
    pub board_width: usize,
    pub board_height: usize,
    pub score: u32,
    pub steps: u32,
    pub practice: bool,
    pub remaining_undos: u32,
    pub undo_stack: Vec<MoveRecord>,
    pub status: RoundStatus,
}

impl GameState {
    /// Create a new active round with a fresh undo budget
    pub fn new(
        snake: Snake,
        food: HashSet<Position>,
        bombs: HashSet<Position>,
        board_width: usize,
        board_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            bombs,
            board_width,
            board_height,
            score: 0,
            steps: 0,
            practice: false,
            remaining_undos: 3,
            undo_stack: Vec::new(),
            status: RoundStatus::Active,
        }
    }

    /// Check if a position is within the board bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.board_width as i32
            && pos.y >= 0
            && pos.y < self.board_height as i32
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

    /// Whether the final score of this round belongs on the leaderboard
    pub fn is_score_eligible(&self) -> bool {
        !self.practice && !self.is_active()
    }
}
