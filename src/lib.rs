//! Air Juggler - keep the ball in the air with your hands
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, challenges, game loop)
//! - `session`: Frame-driven round orchestration
//! - `renderer`: Draw list generation and Canvas 2D backend
//! - `platform`: Hand tracking collaborator and coordinate mapping
//! - `persistence`: Key-value stores for the high score
//! - `config`: Data-driven game balance and themes

pub mod config;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod ui;

pub use config::{GameConfig, Theme};
pub use error::{ConfigError, StorageError, TrackingError};
pub use highscores::HighScoreStore;
pub use session::{FrameControl, Session};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per display frame, nominally 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default arena dimensions (canvas pixels)
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 480.0;

    /// Spawn height for new balls (distance from the top edge)
    pub const BALL_SPAWN_Y: f32 = 100.0;

    /// Horizontal velocity gained per pixel of off-center hand contact
    pub const HAND_NUDGE_FACTOR: f32 = 0.1;

    /// Maximum number of hands forwarded by the tracker
    pub const MAX_HANDS: usize = 2;

    /// Hand detection cadence (~30 Hz)
    pub const DETECTION_INTERVAL_MS: i32 = 33;

    /// Particle tuning
    pub const PARTICLE_SPREAD: f32 = 4.0;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_MIN_DECAY: f32 = 0.02;
    pub const PARTICLE_MAX_DECAY: f32 = 0.05;
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_MAX_SIZE: f32 = 5.0;

    /// Barrier challenge layout
    pub const BARRIER_HEIGHT: f32 = 16.0;
    pub const BARRIER_MIN_WIDTH: f32 = 80.0;
    pub const BARRIER_MAX_WIDTH: f32 = 200.0;
    /// Vertical band (fraction of arena height) barriers spawn in
    pub const BARRIER_BAND: (f32, f32) = (0.35, 0.65);

    /// Multi-ball spawn velocity spread (px/tick)
    pub const MULTI_BALL_SPREAD: f32 = 2.0;
}

/// Round a countdown to the whole number shown on screen
#[inline]
pub fn countdown_digit(remaining: f32) -> u32 {
    remaining.max(0.0).ceil() as u32
}
