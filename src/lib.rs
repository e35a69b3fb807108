//! SnakeSweeper - Snake meets Minesweeper
//!
//! This library provides:
//! - Core round logic: snake body, placement, moves and undo (game module)
//! - The append-only score log (leaderboard module)
//! - Keyboard and console-line input mapping (input module)
//! - Full-screen and plain-text rendering (render module)
//! - Session figures for the header (metrics module)
//! - The two front-ends, full-screen and console (modes module)

pub mod game;
pub mod input;
pub mod leaderboard;
pub mod metrics;
pub mod modes;
pub mod render;
