use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{Action, GameConfig, GameEngine, GameState, RoundSnapshot, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::leaderboard::{LeaderboardEntry, LeaderboardStore, top_k};
use crate::metrics::GameMetrics;
use crate::render::{Overlay, Renderer, Screen};

const MAX_NAME_LEN: usize = 20;
const LEADERBOARD_SIZE: usize = 10;

/// Full-screen terminal front-end
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    store: LeaderboardStore,
    leaderboard: Vec<LeaderboardEntry>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    show_leaderboard: bool,
    /// Name typed so far, while the post-round prompt is open
    name_input: Option<String>,
    message: Option<String>,
    move_cooldown: Duration,
    last_move: Option<Instant>,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: LeaderboardStore) -> Result<Self> {
        let entries = store.load_all().context("Failed to load leaderboard")?;
        info!(entries = entries.len(), path = ?store.path(), "leaderboard loaded");
        let leaderboard = top_k(&entries, LEADERBOARD_SIZE);

        let move_cooldown = Duration::from_millis(config.move_cooldown_ms);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            store,
            leaderboard,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            show_leaderboard: false,
            name_input: None,
            message: None,
            move_cooldown,
            last_move: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = RoundSnapshot::capture(&self.state);
                    let overlay = self.overlay();
                    let screen = Screen {
                        snapshot: &snapshot,
                        metrics: &self.metrics,
                        top_scores: &self.leaderboard,
                        overlay,
                        message: self.message.as_deref(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &screen);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.quit();
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn overlay(&self) -> Overlay<'_> {
        if self.show_leaderboard {
            Overlay::Leaderboard
        } else if let Some(name) = &self.name_input {
            Overlay::NameEntry(name)
        } else {
            Overlay::None
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            if self.name_input.is_some() {
                return self.handle_name_key(key);
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(Action::Quit) | KeyAction::Quit => self.quit(),
                KeyAction::ToggleLeaderboard => {
                    self.show_leaderboard = !self.show_leaderboard;
                }
                _ if self.show_leaderboard => {}
                KeyAction::GameAction(action) => self.apply(action, Instant::now()),
                KeyAction::Restart => self.reset_game(),
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn handle_name_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(name) = self.name_input.as_mut() else {
            return Ok(());
        };

        match key.code {
            KeyCode::Enter => {
                let name = name.trim().to_string();
                self.name_input = None;
                if !name.is_empty() {
                    self.save_score(&name)?;
                }
            }
            KeyCode::Esc => {
                self.name_input = None;
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !c.is_control()
                    && name.chars().count() < MAX_NAME_LEN =>
            {
                name.push(c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Feed one action to the engine, dropping moves that arrive inside the
    /// cooldown window
    fn apply(&mut self, action: Action, now: Instant) {
        if let Action::Move(_) = action {
            if self
                .last_move
                .is_some_and(|last| now.duration_since(last) < self.move_cooldown)
            {
                return;
            }
        }

        let result = self.engine.step(&mut self.state, action);
        self.message = None;

        match result.outcome {
            StepOutcome::Moved { .. } => self.last_move = Some(now),
            StepOutcome::UndoRejected(rejection) => {
                self.message = Some(rejection.message().to_string());
            }
            StepOutcome::Undone => {
                self.message = Some(format!("Undos remaining: {}", self.state.remaining_undos));
            }
            StepOutcome::Ended(reason) => {
                self.metrics.on_round_end(self.state.score, self.state.practice);
                if reason.is_collision() && !self.state.practice {
                    self.name_input = Some(String::new());
                }
            }
            StepOutcome::Inactive => {}
        }
    }

    fn save_score(&mut self, name: &str) -> Result<()> {
        let entry = self
            .store
            .append(name, i64::from(self.state.score))
            .context("Failed to save score")?;
        self.leaderboard.push(entry);
        self.leaderboard = top_k(&self.leaderboard, LEADERBOARD_SIZE);
        Ok(())
    }

    fn quit(&mut self) {
        if self.state.is_active() {
            self.engine.step(&mut self.state, Action::Quit);
        }
        self.should_quit = true;
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_round_start();
        self.name_input = None;
        self.message = None;
        self.last_move = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        if let Err(err) = disable_raw_mode() {
            warn!(?err, "failed to disable raw mode");
        }
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
