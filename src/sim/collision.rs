//! Collision detection and response
//!
//! Screen edges and axis-aligned paddles, tested against the ball's
//! predicted position for the coming tick.

use glam::Vec2;

use super::state::{Paddle, Side};
use crate::config::GameConfig;

/// True if a ball at `pos` touches the top or bottom edge
#[inline]
pub fn hits_wall(pos: Vec2, radius: f32, screen_height: f32) -> bool {
    pos.y + radius >= screen_height || pos.y - radius <= 0.0
}

/// Which side, if any, the ball has left the screen through.
/// The returned side is the one whose edge was crossed.
pub fn exited_side(pos: Vec2, radius: f32, screen_width: f32) -> Option<Side> {
    if pos.x - radius <= 0.0 {
        Some(Side::Left)
    } else if pos.x + radius >= screen_width {
        Some(Side::Right)
    } else {
        None
    }
}

/// Velocity a ball leaves a paddle with.
///
/// `normalized` is the relative intersection in [-1, 1]. Positive values
/// leave downward, negative ones upward, 0 leaves horizontally. Speed is
/// always `config.ball_speed`.
pub fn bounce_velocity(normalized: f32, side: Side, config: &GameConfig) -> Vec2 {
    let theta = normalized.clamp(-1.0, 1.0) * config.max_bounce_angle();
    Vec2::new(
        side.outward_sign() * theta.cos() * config.ball_speed,
        -theta.sin() * config.ball_speed,
    )
}

/// Test the ball against one paddle and return its new velocity on a hit.
///
/// `ball_pos` is the predicted position. The test is a coarse
/// AABB-with-margin check: the ball's center must sit within a radius-wide
/// band inside either the paddle's vertical faces or its horizontal faces,
/// and inside the paddle box grown by the radius. Corners are not refined
/// with a circle-distance test, so a ball clipping a corner diagonally can
/// register early or late; thresholds are kept as-is for gameplay parity.
pub fn resolve_paddle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    paddle: &Paddle,
    side: Side,
    config: &GameConfig,
) -> Option<Vec2> {
    let half = config.half_paddle();
    let distance = (ball_pos - paddle.pos).abs();

    let face_x = distance.x <= half.x && distance.x >= half.x - ball_radius;
    let face_y = distance.y <= half.y && distance.y >= half.y - ball_radius;
    let in_margin = distance.x <= half.x + ball_radius && distance.y <= half.y + ball_radius;

    if !((face_x || face_y) && in_margin) {
        return None;
    }

    // Offset of the paddle center from a point half a radius above the ball
    // center; a ball striking above center gives a negative value
    let rel_intersect = paddle.pos.y - (ball_pos.y + ball_radius / 2.0);
    let normalized = rel_intersect / half.y;
    Some(bounce_velocity(normalized, side, config))
}
