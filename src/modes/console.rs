//! Text console front-end
//!
//! Reads commands a line at a time (`w a s d` to move, `z` to undo, `q` to
//! quit; several per line are applied in order) and prints the board after
//! each line. Input and output are generic so whole sessions can be scripted.

use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::io::{BufRead, Write};
use tracing::info;

use super::prompt::Prompter;
use crate::game::{
    Action, EndReason, GameConfig, GameEngine, GameState, RoundSnapshot, StepOutcome, StepResult,
};
use crate::input::InputHandler;
use crate::leaderboard::{LeaderboardStore, top_k};
use crate::render::{format_leaderboard, render_board};

const LEADERBOARD_SIZE: usize = 5;

pub struct ConsoleMode<R, W, G = ThreadRng> {
    engine: GameEngine<G>,
    store: LeaderboardStore,
    input_handler: InputHandler,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> ConsoleMode<R, W, ThreadRng> {
    pub fn new(config: GameConfig, store: LeaderboardStore, input: R, output: W) -> Self {
        Self::with_engine(GameEngine::new(config), store, input, output)
    }
}

impl<R: BufRead, W: Write, G: Rng> ConsoleMode<R, W, G> {
    pub fn with_engine(
        engine: GameEngine<G>,
        store: LeaderboardStore,
        input: R,
        output: W,
    ) -> Self {
        Self {
            engine,
            store,
            input_handler: InputHandler::new(),
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Play rounds until the player declines another one
    pub fn run(&mut self) -> Result<()> {
        let mut standings = Vec::new();

        loop {
            let practice = self.engine.config().practice;
            let name = if practice {
                None
            } else {
                self.prompter.ask_text(
                    "Enter your name for the leaderboard (or leave blank for 'Anonymous'): ",
                )?
            };

            let state = self.play_round()?;

            if practice {
                let play_real = self
                    .prompter
                    .ask_yes_no("Practice round ended. Start the full game now?", true)?;
                if !play_real {
                    writeln!(self.out(), "\nThanks for trying the practice round!\n")?;
                    break;
                }
                self.ask_settings()?;
                self.engine.config_mut().practice = false;
                continue;
            }

            let entry = self
                .store
                .append(name.as_deref().unwrap_or_default(), i64::from(state.score))
                .context("Failed to save score")?;
            info!(name = %entry.name, score = entry.score, "console round recorded");

            standings = top_k(
                &self.store.load_all().context("Failed to load leaderboard")?,
                LEADERBOARD_SIZE,
            );
            writeln!(self.out(), "\nCurrent Leaderboard:\n")?;
            write!(self.out(), "{}", format_leaderboard(&standings))?;

            if !self.prompter.ask_yes_no("Play another round?", false)? {
                break;
            }
        }

        if !standings.is_empty() {
            writeln!(self.out(), "\nFinal Leaderboard:\n")?;
            write!(self.out(), "{}", format_leaderboard(&standings))?;
            writeln!(self.out(), "\nThanks for playing SnakeSweeper!\n")?;
        }
        Ok(())
    }

    /// Run one round to its end and return the final state.
    ///
    /// End of input counts as a quit.
    pub fn play_round(&mut self) -> Result<GameState> {
        let mut state = self.engine.reset();

        writeln!(self.out(), "Initial Board:")?;
        self.print_board(&state)?;

        while state.is_active() {
            writeln!(
                self.out(),
                "Score: {} | Undos left: {}",
                state.score,
                state.remaining_undos
            )?;
            self.out().flush()?;

            let actions = match self.prompter.read_line()? {
                Some(line) => self.input_handler.parse_line(&line),
                None => vec![Action::Quit],
            };

            for action in actions {
                let result = self.engine.step(&mut state, action);
                self.report(&state, &result)?;
                if result.terminated {
                    break;
                }
            }

            if state.is_active() {
                self.print_board(&state)?;
            }
        }

        Ok(state)
    }

    fn ask_settings(&mut self) -> Result<()> {
        writeln!(
            self.out(),
            "\nEnter settings for the full game (press Enter to keep current values):\n"
        )?;
        let food = self.engine.config().food_count;
        let bombs = self.engine.config().bomb_count;
        let food = self.prompter.ask_int("How many food items?", food, 1, 100)?;
        let bombs = self.prompter.ask_int("How many bombs?", bombs, 0, 200)?;

        let config = self.engine.config_mut();
        config.food_count = food;
        config.bomb_count = bombs;
        Ok(())
    }

    fn report(&mut self, state: &GameState, result: &StepResult) -> Result<()> {
        match result.outcome {
            StepOutcome::Undone => {
                writeln!(self.out(), "Undos remaining: {}", state.remaining_undos)?;
            }
            StepOutcome::UndoRejected(rejection) => {
                writeln!(self.out(), "{}", rejection.message())?;
            }
            StepOutcome::Ended(reason) => {
                let tail = if state.practice {
                    "Have fun playing the real game!".to_string()
                } else {
                    format!("Final Score: {}", state.score)
                };
                let headline = match reason {
                    EndReason::Quit => "You chose to quit.".to_string(),
                    other => format!("Game Over! {}", other.message()),
                };
                writeln!(self.out(), "{headline} {tail}")?;
            }
            StepOutcome::Moved { .. } | StepOutcome::Inactive => {}
        }
        Ok(())
    }

    fn print_board(&mut self, state: &GameState) -> Result<()> {
        let board = render_board(&RoundSnapshot::capture(state));
        write!(self.out(), "{board}")?;
        Ok(())
    }

    fn out(&mut self) -> &mut W {
        self.prompter.output()
    }
}
