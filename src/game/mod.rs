//! Core game logic module for SnakeSweeper
//!
//! This module contains all the round logic without any I/O or rendering
//! dependencies. Both front-ends drive the same engine.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepOutcome, StepResult, UndoRejection};
pub use snapshot::{CellView, Hint, RoundSnapshot};
pub use state::{EndReason, GameState, MoveRecord, Position, RoundStatus, Snake};
