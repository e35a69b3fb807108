use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, info, warn};

use super::{
    action::{Action, Direction},
    board,
    config::GameConfig,
    state::{EndReason, GameState, MoveRecord, Position, RoundStatus, Snake},
};

/// Why an undo request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoRejection {
    /// The round's undo budget is spent
    NoUndosLeft,
    /// No move has been made since the round started or since the last undo
    NothingToUndo,
}

impl UndoRejection {
    pub fn message(&self) -> &'static str {
        match self {
            UndoRejection::NoUndosLeft => "No more undos left.",
            UndoRejection::NothingToUndo => "Nothing to undo yet.",
        }
    }
}

/// What an action did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The snake advanced one cell
    Moved { ate_food: bool },
    /// The round ended
    Ended(EndReason),
    /// The last move was reverted
    Undone,
    /// The undo request was refused and the round is unchanged
    UndoRejected(UndoRejection),
    /// The round had already ended; nothing changed
    Inactive,
}

/// Result of feeding one action to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the round is over after this action
    pub terminated: bool,
    pub outcome: StepOutcome,
}

impl StepResult {
    fn active(outcome: StepOutcome) -> Self {
        Self {
            terminated: false,
            outcome,
        }
    }

    fn ended(outcome: StepOutcome) -> Self {
        Self {
            terminated: true,
            outcome,
        }
    }
}

/// The game engine that handles all round logic
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing placements from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GameConfig {
        &mut self.config
    }

    /// Start a new round: a one-cell snake in the centre, then food, then
    /// bombs on the cells left over.
    pub fn reset(&mut self) -> GameState {
        let width = self.config.board_width;
        let height = self.config.board_height;

        let snake = Snake::new(Position::new((width / 2) as i32, (height / 2) as i32));
        let food = board::generate_food(
            width,
            height,
            &snake,
            self.config.food_count,
            &mut self.rng,
        );
        let bombs = board::generate_bombs(
            width,
            height,
            &snake,
            &food,
            self.config.bomb_count,
            &mut self.rng,
        );

        info!(
            width,
            height,
            food = food.len(),
            bombs = bombs.len(),
            practice = self.config.practice,
            "round started"
        );

        let mut state = GameState::new(snake, food, bombs, width, height);
        state.practice = self.config.practice;
        state.remaining_undos = self.config.max_undos;
        state
    }

    /// Execute one action against the round
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_active() {
            return StepResult::ended(StepOutcome::Inactive);
        }

        match action {
            Action::Move(direction) => self.apply_move(state, direction),
            Action::Undo => match self.undo(state) {
                Ok(()) => StepResult::active(StepOutcome::Undone),
                Err(rejection) => StepResult::active(StepOutcome::UndoRejected(rejection)),
            },
            Action::Quit => {
                Self::terminate(state, EndReason::Quit);
                StepResult::ended(StepOutcome::Ended(EndReason::Quit))
            }
        }
    }

    /// Advance the snake one cell
    pub fn apply_move(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        if !state.is_active() {
            return StepResult::ended(StepOutcome::Inactive);
        }
        let Some(head) = state.snake.head() else {
            return StepResult::ended(StepOutcome::Inactive);
        };

        let new_head = head.moved_in_direction(direction);

        if let Some(reason) = Self::check_collision(state, new_head) {
            Self::terminate(state, reason);
            return StepResult::ended(StepOutcome::Ended(reason));
        }

        state.snake.push_head(new_head);

        let mut record = MoveRecord {
            head: new_head,
            removed_tail: None,
            ate: false,
            eaten_food: None,
            respawned_food: None,
        };

        if state.food.remove(&new_head) {
            record.ate = true;
            record.eaten_food = Some(new_head);
            if !state.practice {
                state.score += self.config.food_reward;
            }
            record.respawned_food = self.respawn_food(state);
        } else {
            record.removed_tail = state.snake.pop_tail();
        }

        let ate_food = record.ate;
        state.steps += 1;
        state.undo_stack.push(record);

        StepResult::active(StepOutcome::Moved { ate_food })
    }

    /// Revert the most recent move, spending one undo.
    ///
    /// A rejected undo leaves the round untouched.
    pub fn undo(&mut self, state: &mut GameState) -> Result<(), UndoRejection> {
        if state.remaining_undos == 0 {
            debug!("undo rejected: budget spent");
            return Err(UndoRejection::NoUndosLeft);
        }
        let Some(record) = state.undo_stack.pop() else {
            debug!("undo rejected: empty history");
            return Err(UndoRejection::NothingToUndo);
        };

        state.snake.pop_head();

        if record.ate {
            if !state.practice {
                state.score = state.score.saturating_sub(self.config.food_reward);
            }
            if let Some(respawned) = record.respawned_food {
                state.food.remove(&respawned);
            }
            if let Some(eaten) = record.eaten_food {
                state.food.insert(eaten);
            }
        } else if let Some(tail) = record.removed_tail {
            state.snake.push_tail(tail);
        }

        state.steps = state.steps.saturating_sub(1);
        state.remaining_undos -= 1;
        debug!(remaining = state.remaining_undos, "move undone");
        Ok(())
    }

    /// Check if the new head position ends the round
    fn check_collision(state: &GameState, pos: Position) -> Option<EndReason> {
        if !state.is_in_bounds(pos) {
            return Some(EndReason::Wall);
        }

        if state.snake.contains(pos) {
            return Some(EndReason::SelfCollision);
        }

        if state.bombs.contains(&pos) {
            return Some(EndReason::Bomb);
        }

        None
    }

    fn terminate(state: &mut GameState, reason: EndReason) {
        state.status = RoundStatus::Terminated(reason);
        info!(
            reason = ?reason,
            score = state.score,
            length = state.snake.len(),
            practice = state.practice,
            "round ended"
        );
    }

    /// Place one food on a cell free of snake, food and bombs
    fn respawn_food(&mut self, state: &mut GameState) -> Option<Position> {
        let spot = board::random_free_cell(
            state.board_width,
            state.board_height,
            |pos| {
                state.snake.contains(pos)
                    || state.food.contains(&pos)
                    || state.bombs.contains(&pos)
            },
            self.config.respawn_attempts,
            &mut self.rng,
        );

        match spot {
            Some(pos) => {
                state.food.insert(pos);
            }
            None => warn!("board full, food not respawned"),
        }
        spot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn engine(config: GameConfig) -> GameEngine<StdRng> {
        GameEngine::with_rng(config, StdRng::seed_from_u64(11))
    }

    fn cells(list: &[(i32, i32)]) -> HashSet<Position> {
        list.iter().map(|&(x, y)| p(x, y)).collect()
    }

    fn round(snake: &[(i32, i32)], food: &[(i32, i32)], bombs: &[(i32, i32)]) -> GameState {
        let snake = Snake::from_cells(snake.iter().map(|&(x, y)| p(x, y))).unwrap();
        GameState::new(snake, cells(food), cells(bombs), 10, 7)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_active());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.remaining_undos, 3);
        assert_eq!(state.snake.to_sequence(), vec![p(5, 4)]);
        assert_eq!(state.food.len(), 3);
        assert_eq!(state.bombs.len(), 7);
        assert!(state.food.is_disjoint(&state.bombs));
        assert!(!state.food.contains(&p(5, 4)));
        assert!(!state.bombs.contains(&p(5, 4)));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3), (2, 3)], &[(9, 0)], &[]);

        let result = engine.step(&mut state, Action::Move(Direction::Right));

        assert!(!result.terminated);
        assert_eq!(result.outcome, StepOutcome::Moved { ate_food: false });
        assert_eq!(state.snake.to_sequence(), vec![p(4, 3), p(3, 3)]);
        assert_eq!(state.steps, 1);
        assert_eq!(state.undo_stack.len(), 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3)], &[(4, 3), (0, 0), (9, 6)], &[(5, 5)]);

        let result = engine.step(&mut state, Action::Move(Direction::Right));

        assert_eq!(result.outcome, StepOutcome::Moved { ate_food: true });
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 2);
        assert!(!state.food.contains(&p(4, 3)));
        assert_eq!(state.food.len(), 3);
        assert!(!state.food.contains(&p(5, 5)));
        for food in &state.food {
            assert!(!state.snake.contains(*food));
        }
    }

    #[test]
    fn test_practice_keeps_score() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3)], &[(4, 3)], &[]);
        state.practice = true;

        engine.step(&mut state, Action::Move(Direction::Right));
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 2);

        engine.step(&mut state, Action::Undo);
        assert_eq!(state.score, 0);
        assert!(!state.is_score_eligible());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::new(10, 7));
        let mut state = round(&[(0, 3)], &[(5, 5)], &[]);
        state.score = 20;
        let before = state.snake.clone();

        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert!(result.terminated);
        assert_eq!(result.outcome, StepOutcome::Ended(EndReason::Wall));
        assert_eq!(state.end_reason(), Some(EndReason::Wall));
        assert_eq!(state.score, 20);
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::default());
        // Head at (5,5), second segment at (4,5)
        let mut state = round(&[(5, 5), (4, 5), (4, 4), (5, 4)], &[(9, 0)], &[]);

        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert!(result.terminated);
        assert_eq!(result.outcome, StepOutcome::Ended(EndReason::SelfCollision));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_moving_into_current_tail_is_fatal() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(5, 5), (4, 5), (4, 4), (5, 4)], &[(9, 0)], &[]);

        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert_eq!(result.outcome, StepOutcome::Ended(EndReason::SelfCollision));
    }

    #[test]
    fn test_bomb_collision() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(2, 2)], &[(9, 0)], &[(2, 1)]);

        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert_eq!(result.outcome, StepOutcome::Ended(EndReason::Bomb));
        assert_eq!(state.snake.to_sequence(), vec![p(2, 2)]);
    }

    #[test]
    fn test_terminated_round_accepts_nothing() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(0, 0), (1, 0)], &[(9, 0)], &[]);
        engine.step(&mut state, Action::Move(Direction::Right));
        engine.step(&mut state, Action::Move(Direction::Up));
        let frozen = state.clone();

        let result = engine.step(&mut state, Action::Move(Direction::Down));
        assert!(result.terminated);
        assert_eq!(result.outcome, StepOutcome::Inactive);

        let result = engine.step(&mut state, Action::Undo);
        assert_eq!(result.outcome, StepOutcome::Inactive);
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_quit_keeps_score() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3)], &[(4, 3)], &[]);
        engine.step(&mut state, Action::Move(Direction::Right));

        let result = engine.step(&mut state, Action::Quit);

        assert!(result.terminated);
        assert_eq!(state.end_reason(), Some(EndReason::Quit));
        assert_eq!(state.score, 10);
        assert!(state.is_score_eligible());
    }

    #[test]
    fn test_undo_plain_move_is_exact_inverse() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3), (3, 4), (3, 5)], &[(8, 1)], &[(0, 6)]);
        let before = state.clone();

        engine.step(&mut state, Action::Move(Direction::Left));
        let result = engine.step(&mut state, Action::Undo);

        assert_eq!(result.outcome, StepOutcome::Undone);
        assert_eq!(state.snake.to_sequence(), before.snake.to_sequence());
        assert_eq!(state.food, before.food);
        assert_eq!(state.bombs, before.bombs);
        assert_eq!(state.score, before.score);
        assert_eq!(state.remaining_undos, before.remaining_undos - 1);
    }

    #[test]
    fn test_undo_eating_move_restores_food_and_score() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(3, 3), (2, 3)], &[(4, 3), (7, 0)], &[(1, 1)]);
        let before = state.clone();

        engine.step(&mut state, Action::Move(Direction::Right));
        assert_eq!(state.score, 10);
        engine.step(&mut state, Action::Undo);

        assert_eq!(state.snake.to_sequence(), before.snake.to_sequence());
        assert_eq!(state.food, before.food);
        assert_eq!(state.score, 0);
        assert_eq!(state.remaining_undos, 2);
        assert!(state.undo_stack.is_empty());
    }

    #[test]
    fn test_undo_budget() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(0, 0)], &[(9, 6)], &[]);
        for _ in 0..5 {
            engine.step(&mut state, Action::Move(Direction::Right));
        }
        for _ in 0..3 {
            assert_eq!(engine.step(&mut state, Action::Undo).outcome, StepOutcome::Undone);
        }
        let spent = state.clone();

        let result = engine.step(&mut state, Action::Undo);

        assert_eq!(
            result.outcome,
            StepOutcome::UndoRejected(UndoRejection::NoUndosLeft)
        );
        assert_eq!(state, spent);
        assert_eq!(state.snake.head(), Some(p(2, 0)));
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut engine = engine(GameConfig::default());
        let mut state = round(&[(4, 4)], &[(9, 6)], &[]);

        let result = engine.step(&mut state, Action::Undo);

        assert!(!result.terminated);
        assert_eq!(
            result.outcome,
            StepOutcome::UndoRejected(UndoRejection::NothingToUndo)
        );
        assert_eq!(state.remaining_undos, 3);
    }

    #[test]
    fn test_full_board_skips_respawn() {
        let mut engine = engine(GameConfig::new(2, 1));
        let snake = Snake::new(p(0, 0));
        let mut state = GameState::new(snake, cells(&[(1, 0)]), HashSet::new(), 2, 1);

        let result = engine.step(&mut state, Action::Move(Direction::Right));

        assert_eq!(result.outcome, StepOutcome::Moved { ate_food: true });
        assert!(state.food.is_empty());
        assert_eq!(state.undo_stack[0].respawned_food, None);

        engine.step(&mut state, Action::Undo);
        assert_eq!(state.food, cells(&[(1, 0)]));
        assert_eq!(state.snake.to_sequence(), vec![p(0, 0)]);
    }

    #[test]
    fn test_random_walk_keeps_invariants() {
        let mut engine = engine(GameConfig::default().with_bombs(4));
        let mut state = engine.reset();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..500 {
            if !state.is_active() {
                state = engine.reset();
            }
            let len_before = state.snake.len();
            let dir = Direction::ALL[rng.gen_range(0..4)];
            let result = engine.step(&mut state, Action::Move(dir));

            let seq = state.snake.to_sequence();
            let unique: HashSet<Position> = seq.iter().copied().collect();
            assert_eq!(unique.len(), seq.len());
            for y in 0..8 {
                for x in 0..10 {
                    assert_eq!(state.snake.contains(p(x, y)), unique.contains(&p(x, y)));
                }
            }

            match result.outcome {
                StepOutcome::Moved { ate_food: true } => assert_eq!(seq.len(), len_before + 1),
                _ => assert_eq!(seq.len(), len_before),
            }
            assert!(state.food.is_disjoint(&unique));
            if state.is_active() {
                assert_eq!(state.food.len(), 3);
            }
        }
    }
}
