//! Keyboard state and per-tick input sampling

use std::collections::HashMap;

use super::state::{GameState, Paddle};
use crate::config::GameConfig;

/// Pressed/released state per key identifier.
///
/// Written by key events between frames and read once per tick. Keys that
/// were never seen count as released.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keys: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, pressed: bool) {
        self.keys.insert(key.to_string(), pressed);
    }

    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }
}

/// Paddle velocities for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left_paddle_vel: f32,
    pub right_paddle_vel: f32,
}

/// Velocity for one paddle: up adds, down subtracts, each only while the
/// paddle has room to move that way. Both held cancel out.
fn paddle_velocity(up: bool, down: bool, paddle: &Paddle, config: &GameConfig) -> f32 {
    let (min_y, max_y) = config.paddle_y_bounds();
    let mut vel = 0.0;
    if up && paddle.pos.y < max_y {
        vel += config.paddle_speed;
    }
    if down && paddle.pos.y > min_y {
        vel -= config.paddle_speed;
    }
    vel
}

/// Read the key state and produce this tick's paddle velocities
pub fn sample_input(keys: &KeyState, state: &GameState, config: &GameConfig) -> TickInput {
    let bindings = &config.keys;
    TickInput {
        left_paddle_vel: paddle_velocity(
            keys.is_pressed(&bindings.left_up),
            keys.is_pressed(&bindings.left_down),
            &state.paddles.left,
            config,
        ),
        right_paddle_vel: paddle_velocity(
            keys.is_pressed(&bindings.right_up),
            keys.is_pressed(&bindings.right_down),
            &state.paddles.right,
            config,
        ),
    }
}
