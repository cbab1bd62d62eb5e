//! Game configuration and themes
//!
//! Both game variants share one engine; a `Theme` only swaps tuning and palette.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::error::ConfigError;
use crate::sim::Color;

/// Visual/tuning variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Classic,
    Neon,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "Classic",
            Theme::Neon => "Neon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Some(Theme::Classic),
            "neon" => Some(Theme::Neon),
            _ => None,
        }
    }

    /// Theme named by a `theme=` parameter in a URL query string (`?theme=neon&...`)
    pub fn from_query(search: &str) -> Option<Self> {
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "theme")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// Colors used by the renderer and particle bursts
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Classic => Palette {
                background: Color::rgb(0, 0, 0),
                video_dim: Color::rgba(0, 0, 0, 0.3),
                ball_outline: Color::WHITE,
                hand_outline: Color::rgba(255, 255, 255, 0.8),
                hand_fill: Color::rgba(100, 200, 255, 0.3),
                barrier: Color::rgb(255, 120, 80),
                wall_spark: Color::rgb(255, 255, 255),
                hand_spark: Color::rgb(100, 200, 255),
                challenge_spark: Color::rgb(255, 215, 0),
                text: Color::WHITE,
            },
            Theme::Neon => Palette {
                background: Color::rgb(8, 0, 24),
                video_dim: Color::rgba(8, 0, 24, 0.5),
                ball_outline: Color::rgb(0, 255, 240),
                hand_outline: Color::rgba(255, 0, 200, 0.9),
                hand_fill: Color::rgba(255, 0, 200, 0.25),
                barrier: Color::rgb(120, 255, 0),
                wall_spark: Color::rgb(0, 255, 240),
                hand_spark: Color::rgb(255, 0, 200),
                challenge_spark: Color::rgb(120, 255, 0),
                text: Color::rgb(0, 255, 240),
            },
        }
    }
}

/// Theme colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    /// Overlay drawn on top of the webcam frame
    pub video_dim: Color,
    pub ball_outline: Color,
    pub hand_outline: Color,
    pub hand_fill: Color,
    pub barrier: Color,
    pub wall_spark: Color,
    pub hand_spark: Color,
    pub challenge_spark: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Theme::Classic.palette()
    }
}

/// Game tuning. Velocities are in pixels per tick, gravity in pixels per tick².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub theme: Theme,

    // === Arena ===
    pub width: f32,
    pub height: f32,

    // === Balls ===
    /// Balls spawned at round start
    pub ball_count: u32,
    pub ball_radius: f32,
    /// Base gravity, restored on every restart
    pub gravity: f32,
    /// Vertical velocity a hand hit sets (negative is up)
    pub bounce_velocity: f32,

    // === Hands ===
    pub hand_radius: f32,

    // === Round flow ===
    pub countdown_secs: f32,
    /// Challenges fire at every positive multiple of this many seconds
    pub challenge_interval_secs: u32,
    /// Gravity added by the SpeedUp challenge
    pub gravity_increment: f32,
    /// Velocity retained after bouncing off a barrier
    pub barrier_damping: f32,
    pub notification_secs: f32,

    // === Effects ===
    pub burst_size: usize,
    pub max_particles: usize,

    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Classic,

            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,

            ball_count: 1,
            ball_radius: 20.0,
            gravity: 0.2,
            bounce_velocity: -8.0,

            hand_radius: 50.0,

            countdown_secs: 3.0,
            challenge_interval_secs: 30,
            gravity_increment: 0.05,
            barrier_damping: 0.9,
            notification_secs: 3.0,

            burst_size: 12,
            max_particles: 500,

            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    /// Create a config from a theme (applies the theme's tuning and palette)
    pub fn for_theme(theme: Theme) -> Self {
        let mut config = Self::default();
        config.apply_theme(theme);
        config
    }

    /// Apply a theme's tuning and palette
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = theme.palette();

        // Neon plays heavier and hits harder
        if theme == Theme::Neon {
            self.gravity = 0.25;
            self.bounce_velocity = -9.0;
        }
    }

    /// Resize the arena (canvas resize)
    pub fn with_arena(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Parse a config from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.ball_radius > 0.0) || self.ball_radius * 2.0 > self.width {
            return Err(ConfigError::Invalid(format!(
                "ball radius {} does not fit arena width {}",
                self.ball_radius, self.width
            )));
        }
        if self.ball_count == 0 {
            return Err(ConfigError::Invalid("ball_count must be at least 1".into()));
        }
        if !(self.hand_radius > 0.0) {
            return Err(ConfigError::Invalid("hand_radius must be positive".into()));
        }
        if self.challenge_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "challenge_interval_secs must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.barrier_damping) {
            return Err(ConfigError::Invalid(format!(
                "barrier_damping {} outside [0, 1]",
                self.barrier_damping
            )));
        }
        Ok(())
    }

    /// Top-center spawn point for new balls
    pub fn spawn_point(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, crate::consts::BALL_SPAWN_Y)
    }
}
