//! Duel Pong - two-player Pong in the browser
//!
//! Core modules:
//! - `sim`: Simulation loop (input sampling, kinematics, collisions, scoring)
//! - `frame`: Per-frame driver that dispatches to renderer/sound collaborators
//! - `renderer`: Instanced wgpu pipeline (WebGL2 backend on the web)
//! - `audio`: Cue playback from short audio assets
//! - `config`: Session geometry, speeds and key bindings
//! - `settings`: Player preferences persisted in LocalStorage

pub mod audio;
pub mod config;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, KeyBindings};
pub use error::{InitError, RenderError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Assumed length of the first frame, before two timestamps exist
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;

    /// Default canvas size (used when the host does not supply one)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    /// Distance from the side edge to the paddle center
    pub const PADDLE_INSET: f32 = 35.0;
    /// Pixels per tick while a key is held
    pub const PADDLE_SPEED: f32 = 5.0;

    /// Ball defaults (20px diameter)
    pub const BALL_RADIUS: f32 = 10.0;
    /// Serve velocity, pixels per tick
    pub const BALL_INITIAL_VELOCITY: (f32, f32) = (4.5, 4.5);

    /// Maximum deflection off a paddle, in degrees
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 30.0;

    /// Center line dash size and vertical pitch
    pub const DASH_WIDTH: f32 = 10.0;
    pub const DASH_HEIGHT: f32 = 20.0;
    pub const DASH_GAP: f32 = 20.0;

    /// Triangles in the ball's fan approximation
    pub const BALL_SEGMENTS: u32 = 100;
}
