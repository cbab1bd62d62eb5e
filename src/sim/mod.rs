//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod challenge;
pub mod collision;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_hands;
pub use challenge::{apply_challenge, pick_challenge, should_trigger, update_challenges};
pub use collision::{
    BarrierEdge, CollisionResult, Impact, ImpactKind, ball_barrier_collision, ball_hand_collision,
    resolve_barriers, resolve_hands,
};
pub use particles::{spawn_burst, tick_particles};
pub use physics::step_balls;
pub use state::{
    Ball, Barrier, ChallengeKind, ChallengeRecord, Color, GamePhase, GameState, Hand, Notification,
    Particle,
};
pub use tick::{GameEvent, TickInput, tick};
