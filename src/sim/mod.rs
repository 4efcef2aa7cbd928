//! Simulation module
//!
//! All gameplay logic lives here. It has no rendering, audio or platform
//! dependencies, so it can be driven with synthetic frames:
//! - Explicit `GameState`, no globals
//! - Input is sampled once per tick from a key-state snapshot
//! - Effects leave the tick as `GameEvent`s

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{bounce_velocity, exited_side, hits_wall, resolve_paddle_collision};
pub use input::{KeyState, TickInput, sample_input};
pub use state::{Ball, GameEvent, GameState, Paddle, Paddles, Scores, Side};
pub use tick::tick;
