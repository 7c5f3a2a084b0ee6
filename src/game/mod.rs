//! Core game logic: grid geometry, the snake, and the engine that steps
//! and transitions a single mutable [`GameState`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepResult};
pub use state::{CollisionType, GameState, GameStatus, Position, Snake};
