//! Per-frame driver
//!
//! Runs one simulation tick per display refresh and hands the results to the
//! external collaborators: a renderer for instance positions, a sound trigger
//! for cues and a score board. The host owns scheduling (`requestAnimationFrame`
//! on the web); nothing in here schedules itself.

use glam::Vec2;

use crate::config::GameConfig;
use crate::consts::NOMINAL_FRAME_DT;
use crate::error::RenderError;
use crate::renderer::shapes::center_line_offsets;
use crate::sim::{GameEvent, GameState, KeyState, Scores, sample_input, tick};

/// Instanced draw batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Ball,
    Paddles,
    CenterLine,
}

/// Short fire-and-forget sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Wall,
    Score,
    BallHit,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::WallBounce => Cue::Wall,
            GameEvent::PaddleHit { .. } => Cue::BallHit,
            GameEvent::Scored { .. } => Cue::Score,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Wall => "wall",
            Cue::Score => "score",
            Cue::BallHit => "ballHit",
        }
    }
}

/// Draws instanced geometry
pub trait Renderer {
    /// Replace the per-instance offsets of one batch
    fn update_instance_positions(&mut self, entity: Entity, positions: &[Vec2]);
    /// Clear and draw every batch
    fn draw_frame(&mut self) -> Result<(), RenderError>;
}

/// Plays cues. Must not block; failures are swallowed by the implementation.
pub trait SoundTrigger {
    fn play(&mut self, cue: Cue);
}

/// On-screen score text
pub trait ScoreBoard {
    fn show(&mut self, scores: Scores);
}

/// Turns host timestamps (ms) into frame deltas (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; a repeated timestamp yields 0
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32).max(0.0),
            None => NOMINAL_FRAME_DT,
        };
        self.last_time = Some(now_ms);
        dt
    }
}

/// Owns the game state and key state for one session
pub struct FrameDriver {
    pub state: GameState,
    pub keys: KeyState,
    config: GameConfig,
    clock: FrameClock,
}

impl FrameDriver {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::new(&config),
            keys: KeyState::new(),
            config,
            clock: FrameClock::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Record a key event; takes effect on the next frame
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        self.keys.set(key, pressed);
    }

    /// Upload batches that never move and show the starting score
    pub fn init_scene(&self, renderer: &mut impl Renderer, scoreboard: &mut impl ScoreBoard) {
        renderer.update_instance_positions(Entity::CenterLine, &center_line_offsets(&self.config));
        renderer.update_instance_positions(Entity::Ball, &[self.state.ball.pos]);
        renderer.update_instance_positions(Entity::Paddles, &self.state.paddles.positions());
        scoreboard.show(self.state.scores);
    }

    /// Run one tick at host time `now_ms` and dispatch its results
    pub fn frame(
        &mut self,
        now_ms: f64,
        renderer: &mut impl Renderer,
        sound: &mut impl SoundTrigger,
        scoreboard: &mut impl ScoreBoard,
    ) -> Result<Vec<GameEvent>, RenderError> {
        let dt = self.clock.delta(now_ms);
        let input = sample_input(&self.keys, &self.state, &self.config);
        let events = tick(&mut self.state, &input, &self.config, dt);

        renderer.update_instance_positions(Entity::Ball, &[self.state.ball.pos]);
        renderer.update_instance_positions(Entity::Paddles, &self.state.paddles.positions());

        for event in &events {
            sound.play(Cue::for_event(event));
            if let GameEvent::Scored { scores, .. } = event {
                scoreboard.show(*scores);
            }
        }

        renderer.draw_frame()?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;

    #[derive(Default)]
    struct RecordingRenderer {
        updates: Vec<(Entity, Vec<Vec2>)>,
        draws: u32,
        fail_next: bool,
    }

    impl Renderer for RecordingRenderer {
        fn update_instance_positions(&mut self, entity: Entity, positions: &[Vec2]) {
            self.updates.push((entity, positions.to_vec()));
        }

        fn draw_frame(&mut self) -> Result<(), RenderError> {
            if std::mem::take(&mut self.fail_next) {
                return Err(RenderError::SurfaceLost);
            }
            self.draws += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSound(Vec<Cue>);

    impl SoundTrigger for RecordingSound {
        fn play(&mut self, cue: Cue) {
            self.0.push(cue);
        }
    }

    #[derive(Default)]
    struct RecordingBoard(Vec<Scores>);

    impl ScoreBoard for RecordingBoard {
        fn show(&mut self, scores: Scores) {
            self.0.push(scores);
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(GameConfig::for_screen(800.0, 600.0))
    }

    #[test]
    fn test_clock_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), NOMINAL_FRAME_DT);
        assert!((clock.delta(1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(clock.delta(1016.0), 0.0);
    }

    #[test]
    fn test_init_scene_uploads_static_batches() {
        let driver = driver();
        let mut renderer = RecordingRenderer::default();
        let mut board = RecordingBoard::default();
        driver.init_scene(&mut renderer, &mut board);

        let entities: Vec<_> = renderer.updates.iter().map(|(e, _)| *e).collect();
        assert_eq!(entities, vec![Entity::CenterLine, Entity::Ball, Entity::Paddles]);
        assert_eq!(renderer.updates[0].1.len(), 16);
        assert_eq!(board.0, vec![Scores::default()]);
        assert_eq!(renderer.draws, 0);
    }

    #[test]
    fn test_frame_updates_moving_batches_then_draws() {
        let mut driver = driver();
        let mut renderer = RecordingRenderer::default();
        let mut sound = RecordingSound::default();
        let mut board = RecordingBoard::default();

        driver.set_key("w", true);
        let events = driver
            .frame(0.0, &mut renderer, &mut sound, &mut board)
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(renderer.draws, 1);
        assert_eq!(
            renderer.updates,
            vec![
                (Entity::Ball, vec![Vec2::new(404.5, 304.5)]),
                (Entity::Paddles, vec![Vec2::new(35.0, 305.0), Vec2::new(765.0, 300.0)]),
            ]
        );
        assert!(sound.0.is_empty());
        assert!(board.0.is_empty());
    }

    #[test]
    fn test_repeated_timestamp_holds_ball() {
        let mut driver = driver();
        let mut renderer = RecordingRenderer::default();
        let mut sound = RecordingSound::default();
        let mut board = RecordingBoard::default();

        driver.frame(16.0, &mut renderer, &mut sound, &mut board).unwrap();
        let pos = driver.state.ball.pos;
        driver.frame(16.0, &mut renderer, &mut sound, &mut board).unwrap();
        assert_eq!(driver.state.ball.pos, pos);
        assert_eq!(renderer.draws, 2);
    }

    #[test]
    fn test_events_become_cues_and_score_updates() {
        let mut driver = driver();
        let mut renderer = RecordingRenderer::default();
        let mut sound = RecordingSound::default();
        let mut board = RecordingBoard::default();

        driver.state.ball.pos = Vec2::new(12.0, 100.0);
        driver.state.ball.vel = Vec2::new(-4.5, 0.0);
        driver.frame(0.0, &mut renderer, &mut sound, &mut board).unwrap();
        assert_eq!(sound.0, vec![Cue::Score]);
        assert_eq!(board.0, vec![Scores { left: 0, right: 1 }]);

        driver.state.ball.pos = Vec2::new(400.0, 586.0);
        driver.state.ball.vel = Vec2::new(4.5, 4.5);
        driver.frame(16.0, &mut renderer, &mut sound, &mut board).unwrap();
        assert_eq!(sound.0, vec![Cue::Score, Cue::Wall]);
        assert_eq!(board.0.len(), 1);

        driver.state.ball.pos = Vec2::new(45.0, 300.0);
        driver.state.ball.vel = Vec2::new(-4.5, 0.0);
        driver.frame(32.0, &mut renderer, &mut sound, &mut board).unwrap();
        assert_eq!(sound.0, vec![Cue::Score, Cue::Wall, Cue::BallHit]);
    }

    #[test]
    fn test_draw_error_is_returned() {
        let mut driver = driver();
        let mut renderer = RecordingRenderer {
            fail_next: true,
            ..Default::default()
        };
        let mut sound = RecordingSound::default();
        let mut board = RecordingBoard::default();

        let result = driver.frame(0.0, &mut renderer, &mut sound, &mut board);
        assert!(matches!(result, Err(RenderError::SurfaceLost)));
        // The tick still happened
        assert_eq!(driver.state.time_ticks, 1);
    }

    #[test]
    fn test_cue_mapping() {
        assert_eq!(Cue::for_event(&GameEvent::WallBounce), Cue::Wall);
        assert_eq!(
            Cue::for_event(&GameEvent::PaddleHit { side: Side::Right }),
            Cue::BallHit
        );
        assert_eq!(Cue::BallHit.as_str(), "ballHit");
    }
}
