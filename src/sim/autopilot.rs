//! Demo mode: synthesizes hands that keep the balls up
//!
//! Used by the native headless run and by simulation tests.

use glam::Vec2;

use super::state::{GameState, Hand};
use crate::config::GameConfig;
use crate::consts::MAX_HANDS;

/// Fraction of the arena height the autopilot hands hover at
const HIT_LINE: f32 = 0.8;

/// One hand under each of the (up to two) lowest balls
pub fn autopilot_hands(state: &GameState, config: &GameConfig) -> Vec<Hand> {
    // Lead each ball by one tick of travel
    let mut targets: Vec<Vec2> = state.balls.iter().map(|b| b.pos + b.vel).collect();
    // Lowest (largest y) first - those are closest to being lost
    targets.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

    // Oscillating offset so the ball doesn't settle into a perfect vertical loop
    let time_factor = state.time_ticks as f32 * 0.01;
    let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15) * config.ball_radius;

    let hit_y = config.height * HIT_LINE;
    targets
        .into_iter()
        .take(MAX_HANDS)
        .map(|target| {
            let x = (target.x + offset).clamp(0.0, config.width);
            Hand::new(x, hit_y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Color};

    #[test]
    fn test_hands_follow_lowest_balls() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.balls = vec![
            Ball::new(Vec2::new(100.0, 50.0), Vec2::ZERO, 20.0, Color::WHITE),
            Ball::new(Vec2::new(300.0, 300.0), Vec2::ZERO, 20.0, Color::WHITE),
            Ball::new(Vec2::new(500.0, 200.0), Vec2::ZERO, 20.0, Color::WHITE),
        ];

        let hands = autopilot_hands(&state, &config);
        assert_eq!(hands.len(), 2);
        assert!((hands[0].pos.x - 300.0).abs() <= config.ball_radius);
        assert!((hands[1].pos.x - 500.0).abs() <= config.ball_radius);
        assert!(hands.iter().all(|h| h.pos.y == config.height * HIT_LINE));
    }

    #[test]
    fn test_no_balls_no_hands() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.balls.clear();
        assert!(autopilot_hands(&state, &config).is_empty());
    }
}
