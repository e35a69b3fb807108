use std::time::{Duration, Instant};

/// Per-process session figures shown alongside the board
pub struct GameMetrics {
    pub round_start: Instant,
    pub elapsed_time: Duration,
    /// Best leaderboard-eligible score this session
    pub high_score: u32,
    pub rounds_played: u32,
    /// The clock stops when a round ends
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            rounds_played: 0,
            running: true,
        }
    }

    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.round_start.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.round_start = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    /// Record a finished round. Practice scores never count as a best.
    pub fn on_round_end(&mut self, final_score: u32, practice: bool) {
        self.update();
        self.running = false;
        self.rounds_played += 1;
        if !practice && final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
