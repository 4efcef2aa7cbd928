//! Session configuration
//!
//! Geometry and speeds are fixed for a session: the host derives them once
//! from the canvas size and never resizes mid-game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Key identifiers (browser `KeyboardEvent.key` values) for each paddle action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left_up: String,
    pub left_down: String,
    pub right_up: String,
    pub right_down: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: "w".to_string(),
            left_down: "s".to_string(),
            right_up: "ArrowUp".to_string(),
            right_down: "ArrowDown".to_string(),
        }
    }
}

/// Game configuration for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_inset: f32,
    pub paddle_speed: f32,

    pub ball_radius: f32,
    /// Serve velocity; x sign is chosen by who conceded
    pub initial_velocity: Vec2,
    /// Speed the ball leaves a paddle with (constant, never grows)
    pub ball_speed: f32,
    /// Maximum deflection off a paddle, in degrees
    pub max_bounce_angle_deg: f32,

    pub dash_size: Vec2,
    pub dash_gap: f32,

    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        let initial_velocity = Vec2::new(BALL_INITIAL_VELOCITY.0, BALL_INITIAL_VELOCITY.1);
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_inset: PADDLE_INSET,
            paddle_speed: PADDLE_SPEED,
            ball_radius: BALL_RADIUS,
            initial_velocity,
            ball_speed: initial_velocity.length(),
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            dash_size: Vec2::new(DASH_WIDTH, DASH_HEIGHT),
            dash_gap: DASH_GAP,
            keys: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    /// Default tuning on a screen of the given size
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn half_paddle(&self) -> Vec2 {
        Vec2::new(self.paddle_width / 2.0, self.paddle_height / 2.0)
    }

    #[inline]
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }

    /// Lowest and highest paddle center y
    #[inline]
    pub fn paddle_y_bounds(&self) -> (f32, f32) {
        let half = self.paddle_height / 2.0;
        (half, self.screen_height - half)
    }

    /// Vertical distance between dash centers, if it describes a drawable line
    pub fn dash_pitch(&self) -> Option<f32> {
        let pitch = self.dash_size.y + self.dash_gap;
        (pitch.is_finite() && pitch > 0.0 && self.screen_height.is_finite()).then_some(pitch)
    }

    /// Clamp paddle y to the screen
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let (min, max) = self.paddle_y_bounds();
        y.clamp(min, max)
    }

    pub fn max_bounce_angle(&self) -> f32 {
        self.max_bounce_angle_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_pitch() {
        let mut config = GameConfig::default();
        assert_eq!(config.dash_pitch(), Some(40.0));
        config.dash_gap = -20.0;
        assert_eq!(config.dash_pitch(), None);
    }

    #[test]
    fn test_default_ball_speed_matches_serve() {
        let config = GameConfig::default();
        assert!((config.ball_speed - 4.5 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_bounds() {
        let config = GameConfig::for_screen(800.0, 600.0);
        assert_eq!(config.paddle_y_bounds(), (40.0, 560.0));
        assert_eq!(config.clamp_paddle_y(10.0), 40.0);
        assert_eq!(config.clamp_paddle_y(590.0), 560.0);
        assert_eq!(config.clamp_paddle_y(300.0), 300.0);
    }

    #[test]
    fn test_config_json_keeps_bindings() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys, KeyBindings::default());
        assert_eq!(back.screen_width, 800.0);
    }
}
