//! Per-frame simulation tick
//!
//! One call per rendered frame. Velocities are in pixels per tick; `dt` only
//! guards against zero-length frames.

use super::collision::{exited_side, hits_wall, resolve_paddle_collision};
use super::input::TickInput;
use super::state::{GameEvent, GameState, Side};
use crate::config::GameConfig;

/// Advance the game state by one frame and report what happened
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    state.paddles.left.integrate(input.left_paddle_vel, config);
    state.paddles.right.integrate(input.right_paddle_vel, config);

    // Zero-length frame (duplicate timestamp): leave the ball where it is
    if dt <= 0.0 {
        return events;
    }

    let side = state.active_side(config);
    let ball = &mut state.ball;
    let predicted = ball.predicted();

    // Flip only; the position below still follows the pre-flip trajectory
    if hits_wall(predicted, ball.radius, config.screen_height) {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::WallBounce);
    }

    let paddle = state.paddles.get(side);
    if let Some(vel) = resolve_paddle_collision(predicted, ball.radius, paddle, side, config) {
        log::debug!("Paddle hit ({side:?}) at y offset {:.1}", predicted.y - paddle.pos.y);
        ball.vel = vel;
        events.push(GameEvent::PaddleHit { side });
    }

    ball.pos = predicted;

    if let Some(edge) = exited_side(ball.pos, ball.radius, config.screen_width) {
        let scorer = edge.opposite();
        // Serve toward the player who just scored
        let dir = match scorer {
            Side::Right => 1.0,
            Side::Left => -1.0,
        };
        state.scores.award(scorer);
        ball.reset(config.screen_center(), config.initial_velocity, dir);
        log::info!(
            "{scorer:?} scores: {} - {}",
            state.scores.left,
            state.scores.right
        );
        events.push(GameEvent::Scored {
            side: scorer,
            scores: state.scores,
        });
    }

    events
}
