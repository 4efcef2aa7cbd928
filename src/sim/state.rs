//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`; there is no hidden
//! module-level state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Which player / half of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction a ball leaves this side's paddle with
    #[inline]
    pub fn outward_sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Position after one more tick at the current velocity
    #[inline]
    pub fn predicted(&self) -> Vec2 {
        self.pos + self.vel
    }

    /// Snap to `center` and serve with the initial velocity, x signed by `dir`
    pub fn reset(&mut self, center: Vec2, initial_velocity: Vec2, dir: f32) {
        self.pos = center;
        self.vel = Vec2::new(initial_velocity.x * dir, initial_velocity.y);
    }
}

/// A player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Center; x never changes
    pub pos: Vec2,
    /// Vertical velocity applied on the last tick
    pub vel: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: 0.0,
        }
    }

    /// Apply this tick's velocity, keeping the paddle on screen
    pub fn integrate(&mut self, vel: f32, config: &GameConfig) {
        self.vel = vel;
        self.pos.y = config.clamp_paddle_y(self.pos.y + vel);
    }
}

/// Named pair of paddles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddles {
    pub left: Paddle,
    pub right: Paddle,
}

impl Paddles {
    pub fn get(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Centers in draw order (left, right)
    pub fn positions(&self) -> [Vec2; 2] {
        [self.left.pos, self.right.pos]
    }
}

/// Session score; only ever increases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub left: u32,
    pub right: u32,
}

impl Scores {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom edge
    WallBounce,
    /// Ball struck a paddle
    PaddleHit { side: Side },
    /// `side` scored; ball has been re-served
    Scored { side: Side, scores: Scores },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub ball: Ball,
    pub paddles: Paddles,
    pub scores: Scores,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh session: ball at center serving right, paddles centered
    pub fn new(config: &GameConfig) -> Self {
        let center = config.screen_center();
        Self {
            ball: Ball {
                pos: center,
                vel: config.initial_velocity,
                radius: config.ball_radius,
            },
            paddles: Paddles {
                left: Paddle::new(config.paddle_inset, center.y),
                right: Paddle::new(config.screen_width - config.paddle_inset, center.y),
            },
            scores: Scores::default(),
            time_ticks: 0,
        }
    }

    /// Paddle the ball is heading into, by which half it occupies
    pub fn active_side(&self, config: &GameConfig) -> Side {
        if self.ball.pos.x > config.screen_width / 2.0 {
            Side::Right
        } else {
            Side::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let config = GameConfig::for_screen(800.0, 600.0);
        let state = GameState::new(&config);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel, Vec2::new(4.5, 4.5));
        assert_eq!(state.paddles.left.pos, Vec2::new(35.0, 300.0));
        assert_eq!(state.paddles.right.pos, Vec2::new(765.0, 300.0));
        assert_eq!(state.scores, Scores::default());
    }

    #[test]
    fn test_active_side_uses_screen_half() {
        let config = GameConfig::for_screen(800.0, 600.0);
        let mut state = GameState::new(&config);
        // Exactly at the midline counts as left
        assert_eq!(state.active_side(&config), Side::Left);
        state.ball.pos.x = 400.5;
        assert_eq!(state.active_side(&config), Side::Right);
    }

    #[test]
    fn test_paddle_integrate_clamps() {
        let config = GameConfig::for_screen(800.0, 600.0);
        let mut paddle = Paddle::new(35.0, 558.0);
        paddle.integrate(5.0, &config);
        assert_eq!(paddle.pos.y, 560.0);
        assert_eq!(paddle.vel, 5.0);
        assert_eq!(paddle.pos.x, 35.0);
    }

    #[test]
    fn test_ball_reset_direction() {
        let mut ball = Ball {
            pos: Vec2::new(5.0, 100.0),
            vel: Vec2::new(-6.0, 1.0),
            radius: 10.0,
        };
        ball.reset(Vec2::new(400.0, 300.0), Vec2::new(4.5, 4.5), -1.0);
        assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ball.vel, Vec2::new(-4.5, 4.5));
    }

    #[test]
    fn test_scores_award() {
        let mut scores = Scores::default();
        scores.award(Side::Right);
        scores.award(Side::Right);
        scores.award(Side::Left);
        assert_eq!(scores.get(Side::Left), 1);
        assert_eq!(scores.get(Side::Right), 2);
    }
}
