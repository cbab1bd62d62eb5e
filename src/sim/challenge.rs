//! Challenge director
//!
//! Every `challenge_interval_secs` of survival one random challenge fires.
//! Draws are independent, so the same challenge can repeat.

use glam::Vec2;
use rand::Rng;

use super::particles::spawn_burst;
use super::state::{Ball, Barrier, ChallengeKind, ChallengeRecord, Color, GameState};
use crate::config::GameConfig;
use crate::consts::*;

/// True when the current score is a fresh positive multiple of the interval
pub fn should_trigger(state: &GameState, config: &GameConfig) -> bool {
    state.score > 0
        && state.score % config.challenge_interval_secs == 0
        && state.last_challenge_score != Some(state.score)
}

/// Pick a challenge uniformly at random
pub fn pick_challenge<R: Rng>(rng: &mut R) -> ChallengeKind {
    ChallengeKind::ALL[rng.random_range(0..ChallengeKind::ALL.len())]
}

/// Fire a challenge if the score calls for one
pub fn update_challenges(state: &mut GameState, config: &GameConfig) -> Option<ChallengeKind> {
    if !should_trigger(state, config) {
        return None;
    }
    let kind = pick_challenge(&mut state.rng);
    apply_challenge(state, config, kind);
    Some(kind)
}

/// Apply a challenge, announce it and record it in the round history
pub fn apply_challenge(state: &mut GameState, config: &GameConfig, kind: ChallengeKind) {
    match kind {
        ChallengeKind::SpeedUp => {
            state.gravity += config.gravity_increment;
        }
        ChallengeKind::MultiBall => {
            let vel = Vec2::new(
                state.rng.random_range(-MULTI_BALL_SPREAD..MULTI_BALL_SPREAD),
                state.rng.random_range(-MULTI_BALL_SPREAD..MULTI_BALL_SPREAD),
            );
            let hue = state.balls.len() as f32 * 120.0;
            state.balls.push(Ball::new(
                config.spawn_point(),
                vel,
                config.ball_radius,
                Color::hsl(hue, 0.7, 0.6),
            ));
        }
        ChallengeKind::Barriers => {
            let count = state.rng.random_range(2..=3);
            for _ in 0..count {
                let barrier = random_barrier(&mut state.rng, config);
                state.barriers.push(barrier);
            }
        }
    }

    log::info!("Challenge at {}s: {:?}", state.score, kind);

    state.notify(kind.announcement(), config.notification_secs);
    state.last_challenge_score = Some(state.score);
    state.challenge_history.push(ChallengeRecord {
        score: state.score,
        kind,
    });

    let center = Vec2::new(config.width / 2.0, config.height / 2.0);
    spawn_burst(
        &mut state.particles,
        &mut state.rng,
        center,
        config.palette.challenge_spark,
        config.burst_size * 2,
        config.max_particles,
    );
}

/// A barrier of random width somewhere in the middle band of the arena
pub fn random_barrier<R: Rng>(rng: &mut R, config: &GameConfig) -> Barrier {
    let width = rng
        .random_range(BARRIER_MIN_WIDTH..BARRIER_MAX_WIDTH)
        .min(config.width);
    let x = rng.random_range(0.0..=config.width - width);

    let band_top = config.height * BARRIER_BAND.0;
    let band_bottom = (config.height * BARRIER_BAND.1 - BARRIER_HEIGHT).max(band_top);
    let y = rng.random_range(band_top..=band_bottom);

    Barrier::new(x, y, width, BARRIER_HEIGHT)
}
