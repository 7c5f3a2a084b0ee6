use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::GameConfig;
use super::direction::Direction;
use super::state::{CollisionType, GameState, GameStatus, Position, Snake};

/// Result of a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// The collision that ended the run, if one occurred
    pub collision: Option<CollisionType>,
    /// Whether the run has reached its terminal state
    pub game_over: bool,
}

impl StepResult {
    fn nothing() -> Self {
        Self {
            ate_food: false,
            collision: None,
            game_over: false,
        }
    }
}

/// The game engine: owns the configuration and RNG, and is the only code
/// that transitions a [`GameState`] between lifecycle phases.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// An engine with a fixed RNG seed, for deterministic tests
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// A reset board: single-cell snake at the grid center, neutral
    /// direction, score 0, fresh food, waiting for a start.
    pub fn reset(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;
        let snake = Snake::spawn(Position::new(center, center));
        let food = self
            .place_food(&snake)
            .expect("a fresh board always has free cells");

        GameState::new(snake, food, self.config.grid_size)
    }

    /// Begin (or resume after game over) a run. Ignored while Running or
    /// Paused. Starting from Over resets the board first. A snake that has
    /// never been steered sets off to the right.
    pub fn start(&mut self, state: &mut GameState) {
        match state.status {
            GameStatus::Idle => {}
            GameStatus::Over => *state = self.reset(),
            GameStatus::Running | GameStatus::Paused => return,
        }

        if state.snake.direction.is_none() {
            state.snake.direction = Some(Direction::Right);
        }
        state.status = GameStatus::Running;
    }

    /// Toggle between Running and Paused; ignored in any other phase
    pub fn toggle_pause(&self, state: &mut GameState) {
        state.status = match state.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            other => other,
        };
    }

    /// Throw the current run away and return to the Idle reset board
    pub fn restart(&mut self, state: &mut GameState) {
        *state = self.reset();
    }

    /// Execute one simulation step. `steer` is the direction requested
    /// since the last tick; a reversal is rejected and the snake keeps its
    /// course. Does nothing unless the game is Running.
    pub fn step(&mut self, state: &mut GameState, steer: Option<Direction>) -> StepResult {
        if state.status != GameStatus::Running {
            return StepResult {
                game_over: state.status == GameStatus::Over,
                ..StepResult::nothing()
            };
        }

        if let Some(direction) = steer {
            state.snake.turn(direction);
        }

        // Running implies start() assigned a direction.
        let Some(direction) = state.snake.direction else {
            return StepResult::nothing();
        };

        let new_head = state.snake.head().step(direction);
        let ate_food = new_head == state.food;
        state.snake.advance(direction, ate_food);

        // Collision is judged against the fully applied move, so the tail
        // cell vacated this tick no longer counts as occupied.
        let collision = if !state.in_bounds(new_head) {
            Some(CollisionType::Wall)
        } else if state.snake.hits_body(new_head) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if collision.is_some() {
            state.status = GameStatus::Over;
            return StepResult {
                ate_food: false,
                collision,
                game_over: true,
            };
        }

        if ate_food {
            state.score += self.config.food_reward;
            match self.place_food(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    // The snake covers the whole board; the run cannot
                    // continue.
                    state.status = GameStatus::Over;
                    return StepResult {
                        ate_food: true,
                        collision: None,
                        game_over: true,
                    };
                }
            }
        }

        StepResult {
            ate_food,
            collision: None,
            game_over: false,
        }
    }

    /// Pick a food cell uniformly among the cells the snake does not
    /// occupy, or `None` if no such cell exists.
    fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let side = self.config.grid_size as i32;
        let cells = self.config.grid_size * self.config.grid_size;

        if snake.len() >= cells {
            return None;
        }

        // Rejection sampling terminates quickly while the board is mostly
        // empty; past half occupancy, pick from the free cells directly.
        if snake.len() * 2 < cells {
            loop {
                let pos = Position::new(self.rng.gen_range(0..side), self.rng.gen_range(0..side));
                if !snake.occupies(pos) {
                    return Some(pos);
                }
            }
        }

        let free: Vec<Position> = (0..side)
            .flat_map(|y| (0..side).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 0x5eed;

    fn running_state(engine: &mut GameEngine) -> GameState {
        let mut state = engine.reset();
        engine.start(&mut state);
        state
    }

    #[test]
    fn test_reset_board() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let state = engine.reset();

        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.direction, None);
        assert!(!state.snake.occupies(state.food));
        assert!(state.in_bounds(state.food));
    }

    #[test]
    fn test_start_defaults_to_right() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = engine.reset();

        engine.start(&mut state);
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.direction, Some(Direction::Right));
    }

    #[test]
    fn test_start_keeps_steered_direction() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = engine.reset();

        state.snake.turn(Direction::Up);
        engine.start(&mut state);
        assert_eq!(state.snake.direction, Some(Direction::Up));
    }

    #[test]
    fn test_start_ignored_while_running_or_paused() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        engine.step(&mut state, None);
        let snapshot = state.clone();

        engine.start(&mut state);
        assert_eq!(state, snapshot);

        engine.toggle_pause(&mut state);
        engine.start(&mut state);
        assert_eq!(state.status, GameStatus::Paused);
    }

    #[test]
    fn test_start_from_over_resets_everything() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        state.score = 50;
        state.status = GameStatus::Over;

        engine.start(&mut state);
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.direction, Some(Direction::Right));
    }

    #[test]
    fn test_pause_toggles_only_mid_run() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = engine.reset();

        engine.toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Idle);

        engine.start(&mut state);
        engine.toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Paused);
        engine.toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Running);

        state.status = GameStatus::Over;
        engine.toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Over);
    }

    #[test]
    fn test_restart_yields_idle_reset_board() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        state.score = 30;

        engine.restart(&mut state);
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.direction, None);
        assert_ne!(state.food, state.snake.head());
    }

    #[test]
    fn test_step_keeps_length_without_food() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        // Park the food away from the snake's path.
        state.food = Position::new(0, 0);
        let length = state.snake.len();

        let result = engine.step(&mut state, None);
        assert!(!result.ate_food);
        assert!(!result.game_over);
        assert_eq!(state.snake.len(), length);
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_step_noop_unless_running() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = engine.reset();
        let snapshot = state.clone();

        let result = engine.step(&mut state, Some(Direction::Up));
        assert!(!result.game_over);
        assert_eq!(state, snapshot);

        state.status = GameStatus::Over;
        let result = engine.step(&mut state, None);
        assert!(result.game_over);
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_food_consumption_grows_and_scores() {
        // Grid 20x20, snake at (10,10) heading right, food at (11,10).
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        state.food = Position::new(11, 10);

        let result = engine.step(&mut state, None);

        assert!(result.ate_food);
        assert!(!result.game_over);
        assert_eq!(state.score, 10);
        assert_eq!(
            state.snake.body,
            vec![Position::new(11, 10), Position::new(10, 10)]
        );
        assert_ne!(state.food, Position::new(11, 10));
        assert_ne!(state.food, Position::new(10, 10));
        assert!(state.in_bounds(state.food));
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), SEED);
        let mut state = running_state(&mut engine);

        // Feed the snake many times; every placement must avoid the body.
        for _ in 0..30 {
            state.food = state.snake.head().step(Direction::Right);
            if !state.in_bounds(state.food) {
                break;
            }
            let before = state.snake.len();
            let result = engine.step(&mut state, None);
            if result.game_over {
                break;
            }
            assert_eq!(state.snake.len(), before + 1);
            assert!(!state.snake.occupies(state.food));
        }
    }

    #[test]
    fn test_wall_collision_ends_run() {
        // Snake [(0,5),(1,5)] heading left exits the grid at x = -1.
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let snake = Snake {
            body: vec![Position::new(0, 5), Position::new(1, 5)],
            direction: Some(Direction::Left),
        };
        let mut state = GameState::new(snake, Position::new(8, 8), 20);
        state.status = GameStatus::Running;

        let result = engine.step(&mut state, None);

        assert!(result.game_over);
        assert_eq!(result.collision, Some(CollisionType::Wall));
        assert_eq!(state.status, GameStatus::Over);
    }

    #[test]
    fn test_self_collision_ends_run() {
        // A length-5 snake turning back into itself around a 2x2 block:
        // right, down, left, then up lands on a cell still occupied.
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5),
                Position::new(2, 5),
                Position::new(1, 5),
            ],
            direction: Some(Direction::Right),
        };
        let mut state = GameState::new(snake, Position::new(18, 18), 20);
        state.status = GameStatus::Running;

        assert!(!engine.step(&mut state, None).game_over);
        assert!(!engine.step(&mut state, Some(Direction::Down)).game_over);
        assert!(!engine.step(&mut state, Some(Direction::Left)).game_over);
        let result = engine.step(&mut state, Some(Direction::Up));

        assert!(result.game_over);
        assert_eq!(result.collision, Some(CollisionType::SelfCollision));
        assert_eq!(state.status, GameStatus::Over);
    }

    #[test]
    fn test_chasing_the_tail_is_legal() {
        // A length-4 loop around a 2x2 block: the head moves into the cell
        // the tail vacates this same tick, which is not a collision.
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
            ],
            direction: Some(Direction::Up),
        };
        let mut state = GameState::new(snake, Position::new(18, 18), 20);
        state.status = GameStatus::Running;

        for steer in [
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Up,
        ] {
            let result = engine.step(&mut state, Some(steer));
            assert!(!result.game_over);
        }
        assert_eq!(state.snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_reversal_is_rejected_mid_step() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), SEED);
        let mut state = running_state(&mut engine);
        state.food = Position::new(0, 0);

        engine.step(&mut state, Some(Direction::Left));
        assert_eq!(state.snake.direction, Some(Direction::Right));
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_full_board_ends_run() {
        // A 2x2 grid with three cells of snake and food on the last one:
        // eating it leaves nowhere to place food.
        let mut engine = GameEngine::with_seed(GameConfig::new(2), SEED);
        let snake = Snake {
            body: vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)],
            direction: Some(Direction::Right),
        };
        let mut state = GameState::new(snake, Position::new(1, 0), 2);
        state.status = GameStatus::Running;

        let result = engine.step(&mut state, None);

        assert!(result.ate_food);
        assert!(result.game_over);
        assert_eq!(result.collision, None);
        assert_eq!(state.status, GameStatus::Over);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_crowded_board_still_places_food() {
        // Occupy more than half of a 3x3 grid to force the free-cell
        // enumeration path.
        let mut engine = GameEngine::with_seed(GameConfig::new(3), SEED);
        let snake = Snake {
            body: vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(1, 1),
            ],
            direction: Some(Direction::Left),
        };

        for _ in 0..20 {
            let food = engine.place_food(&snake).unwrap();
            assert!(!snake.occupies(food));
            assert!(food.x >= 0 && food.x < 3 && food.y >= 0 && food.y < 3);
        }
    }
}
