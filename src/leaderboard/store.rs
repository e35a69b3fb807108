//! Append-only leaderboard stored as a flat text file
//!
//! Each line holds one entry as `name:score`. Entries are only ever appended;
//! nothing is rewritten or deleted. Lines that do not parse are skipped on
//! load so a hand-edited or truncated file never blocks play.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Name stored when the player leaves theirs blank
pub const ANONYMOUS: &str = "Anonymous";

/// Errors raised while reading or writing the leaderboard file
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("failed to read leaderboard {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write leaderboard {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One recorded score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Parse one `name:score` line.
    ///
    /// Splits on the first colon; returns `None` when there is no colon or
    /// the score is not a base-10 integer.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (name, score) = line.trim().split_once(':')?;
        let score = score.trim().parse::<i64>().ok()?;
        Some(Self::new(name.trim(), score))
    }
}

/// Make a player name safe to store on a single line
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| *c != ':' && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        ANONYMOUS.to_string()
    } else {
        cleaned.to_string()
    }
}

/// The `k` highest scores, best first.
///
/// The sort is stable, so equal scores keep the order they were recorded in.
pub fn top_k(entries: &[LeaderboardEntry], k: usize) -> Vec<LeaderboardEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted.truncate(k);
    sorted
}

/// Leaderboard file handle
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one score, creating the file if needed.
    ///
    /// Returns the entry as it was written, after name sanitising.
    pub fn append(&self, name: &str, score: i64) -> Result<LeaderboardEntry, LeaderboardError> {
        let entry = LeaderboardEntry::new(sanitize_name(name), score);

        let write_err = |source| LeaderboardError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{}:{}", entry.name, entry.score).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        info!(name = %entry.name, score = entry.score, path = ?self.path, "score saved");
        Ok(entry)
    }

    /// Every well-formed entry in file order. A missing file is an empty
    /// leaderboard.
    pub fn load_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no leaderboard file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(LeaderboardError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut entries = Vec::new();
        for (index, raw) in contents.split(|byte| *byte == b'\n').enumerate() {
            // an undecodable line is malformed like any other
            let line = std::str::from_utf8(raw).ok();
            if line.is_some_and(|line| line.trim().is_empty()) {
                continue;
            }
            match line.and_then(LeaderboardEntry::parse_line) {
                Some(entry) => entries.push(entry),
                None => warn!(line = index + 1, "skipping malformed leaderboard line"),
            }
        }
        Ok(entries)
    }

    /// Load the file and return its `k` best entries
    pub fn top(&self, k: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(top_k(&self.load_all()?, k))
    }
}
