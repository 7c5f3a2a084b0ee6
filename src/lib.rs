//! Classic Snake for the terminal.
//!
//! One engine owns the mutable game state; a tokio select loop steps it on
//! a speed-derived timer, steers it from keyboard input, and redraws it
//! with ratatui. The best score and preferred speed survive across
//! sessions in a small JSON file.

pub mod app;
pub mod game;
pub mod input;
pub mod prefs;
pub mod render;
