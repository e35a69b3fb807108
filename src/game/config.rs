use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a round configuration cannot produce a playable board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("food_count must be at least 1")]
    NoFood,
    #[error("board dimension {0} does not fit in a cell coordinate")]
    BoardTooLarge(usize),
}

/// Configuration for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in cells
    pub board_width: usize,
    /// Height of the board in cells
    pub board_height: usize,
    /// Number of food cells kept on the board
    pub food_count: usize,
    /// Number of bombs placed at round start
    pub bomb_count: usize,
    /// Practice mode: bombs are visible and the score never changes
    pub practice: bool,
    /// Undos allowed per round
    pub max_undos: u32,
    /// Points awarded per food eaten
    pub food_reward: u32,
    /// Random probes tried before falling back to a full scan on respawn
    pub respawn_attempts: usize,
    /// Minimum time between two accepted moves in the full-screen front-end
    pub move_cooldown_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 8,
            food_count: 3,
            bomb_count: 7,
            practice: false,
            max_undos: 3,
            food_reward: 10,
            respawn_attempts: 100,
            move_cooldown_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    pub fn with_food(mut self, food_count: usize) -> Self {
        self.food_count = food_count;
        self
    }

    pub fn with_bombs(mut self, bomb_count: usize) -> Self {
        self.bomb_count = bomb_count;
        self
    }

    pub fn with_practice(mut self, practice: bool) -> Self {
        self.practice = practice;
        self
    }

    /// Check that the configuration describes a playable board.
    ///
    /// Food and bomb counts larger than the board are not errors; placement
    /// caps them to the cells actually free.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        for dim in [self.board_width, self.board_height] {
            if i32::try_from(dim).is_err() {
                return Err(ConfigError::BoardTooLarge(dim));
            }
        }
        if self.food_count == 0 {
            return Err(ConfigError::NoFood);
        }
        Ok(())
    }
}
