//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`; the loop owns it and
//! passes it explicitly to each component.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// "Get Ready" countdown before the ball drops
    Countdown,
    /// Active gameplay
    Running,
    /// Round ended, waiting for restart
    GameOver,
}

/// Display color (RGB + alpha)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from hue (degrees), saturation and lightness (0-1)
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS color string for the canvas backend
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed after creation
    pub radius: f32,
    pub color: Color,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
        }
    }

    /// Y of the ball's top edge
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// True once the whole ball has dropped below `floor`
    #[inline]
    pub fn fell_below(&self, floor: f32) -> bool {
        self.top() > floor
    }
}

/// A tracked hand center. Identity is its index in the latest detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub pos: Vec2,
}

impl Hand {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Axis-aligned obstacle spawned by the Barriers challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Barrier {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases by `decay` every tick
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub color: Color,
    /// Downward acceleration (px/tick²)
    pub gravity: f32,
}

/// Random difficulty events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    SpeedUp,
    MultiBall,
    Barriers,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 3] = [
        ChallengeKind::SpeedUp,
        ChallengeKind::MultiBall,
        ChallengeKind::Barriers,
    ];

    /// Banner text shown when the challenge fires
    pub fn announcement(&self) -> &'static str {
        match self {
            ChallengeKind::SpeedUp => "SPEED UP!",
            ChallengeKind::MultiBall => "MULTI BALL!",
            ChallengeKind::Barriers => "BARRIERS!",
        }
    }
}

/// A challenge that fired during the round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Score (seconds) the challenge fired at
    pub score: u32,
    pub kind: ChallengeKind,
}

/// Short-lived on-screen banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    /// Seconds remaining
    pub timer: f32,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of all simulation randomness
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds left in the countdown
    pub countdown: f32,
    /// Wall-clock ms when Running began
    pub start_ms: Option<f64>,
    /// Whole seconds survived
    pub score: u32,
    /// Best score, updated live while it is being beaten
    pub high_score: u32,
    /// Whether this round beat the stored high score
    pub is_new_high_score: bool,
    /// Current gravity (raised by SpeedUp)
    pub gravity: f32,
    /// Score that last triggered a challenge
    pub last_challenge_score: Option<u32>,
    pub challenge_history: Vec<ChallengeRecord>,
    pub notification: Option<Notification>,
    /// Simulation ticks since the round started (including countdown)
    pub time_ticks: u64,
    pub balls: Vec<Ball>,
    /// Latest detection, replaced wholesale
    pub hands: Vec<Hand>,
    /// Draw order follows insertion order
    pub barriers: Vec<Barrier>,
    pub particles: Vec<Particle>,
}

impl GameState {
    /// Create a fresh round in the countdown phase
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Countdown,
            countdown: config.countdown_secs,
            start_ms: None,
            score: 0,
            high_score: 0,
            is_new_high_score: false,
            gravity: config.gravity,
            last_challenge_score: None,
            challenge_history: Vec::new(),
            notification: None,
            time_ticks: 0,
            balls: Vec::new(),
            hands: Vec::new(),
            barriers: Vec::new(),
            particles: Vec::new(),
        };
        state.spawn_initial_balls(config);
        state
    }

    /// Reset everything except the high score and RNG stream, then re-enter countdown
    pub fn restart(&mut self, config: &GameConfig) {
        self.phase = GamePhase::Countdown;
        self.countdown = config.countdown_secs;
        self.start_ms = None;
        self.score = 0;
        self.is_new_high_score = false;
        self.gravity = config.gravity;
        self.last_challenge_score = None;
        self.challenge_history.clear();
        self.notification = None;
        self.time_ticks = 0;
        self.hands.clear();
        self.barriers.clear();
        self.particles.clear();
        self.spawn_initial_balls(config);
    }

    /// Replace the ball set with the configured starting balls
    pub fn spawn_initial_balls(&mut self, config: &GameConfig) {
        self.balls.clear();
        for i in 0..config.ball_count {
            self.balls.push(Ball::new(
                config.spawn_point(),
                Vec2::ZERO,
                config.ball_radius,
                Color::hsl(i as f32 * 120.0, 0.7, 0.6),
            ));
        }
    }

    /// Show a banner for `secs` seconds, replacing any current one
    pub fn notify(&mut self, text: impl Into<String>, secs: f32) {
        self.notification = Some(Notification {
            text: text.into(),
            timer: secs,
        });
    }
}
