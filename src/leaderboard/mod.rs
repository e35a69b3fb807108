//! Persistent score log shared by every round in a process.

pub mod store;

pub use store::{LeaderboardEntry, LeaderboardError, LeaderboardStore, sanitize_name, top_k};
