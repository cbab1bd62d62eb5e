//! Fixed timestep simulation tick
//!
//! Advances the round by one simulated frame (1/60 s) no matter how much wall
//! time actually passed. The phase machine is Countdown → Running → GameOver.

use super::challenge::update_challenges;
use super::collision::{Impact, ImpactKind, resolve_hands};
use super::particles::{spawn_burst, tick_particles};
use super::physics::step_balls;
use super::state::{ChallengeKind, Color, GamePhase, GameState, Hand};
use crate::config::GameConfig;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest hand detection, if one arrived since the last tick
    pub hands: Option<Vec<Hand>>,
    /// Wall clock in milliseconds (start timestamp and score)
    pub now_ms: f64,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Countdown hit zero, balls are live
    CountdownFinished,
    /// The stored high score was beaten for the first time this round
    NewHighScore(u32),
    Challenge(ChallengeKind),
    /// A ball dropped out of the arena
    RoundOver { score: u32, new_high_score: bool },
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, config: &GameConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::GameOver {
        return events;
    }

    // One consistent hand snapshot per tick
    if let Some(hands) = &input.hands {
        state.hands = hands.iter().take(MAX_HANDS).copied().collect();
    }

    state.time_ticks += 1;

    match state.phase {
        GamePhase::Countdown => {
            state.countdown -= SIM_DT;
            // Keep leftover effects animating while counting down
            tick_particles(&mut state.particles);

            if state.countdown <= 0.0 {
                state.countdown = 0.0;
                state.phase = GamePhase::Running;
                state.start_ms = Some(input.now_ms);
                events.push(GameEvent::CountdownFinished);
                log::debug!("Countdown finished at {}ms", input.now_ms);
            }
        }

        GamePhase::Running => {
            // Physics (barriers then edges), then hands
            let mut impacts = step_balls(state, config);
            impacts.extend(resolve_hands(&mut state.balls, &state.hands, config));

            for impact in &impacts {
                let color = impact_color(impact, config);
                spawn_burst(
                    &mut state.particles,
                    &mut state.rng,
                    impact.pos,
                    color,
                    config.burst_size,
                    config.max_particles,
                );
            }
            tick_particles(&mut state.particles);

            update_score(state, input.now_ms);

            if state.score > state.high_score {
                if !state.is_new_high_score {
                    events.push(GameEvent::NewHighScore(state.score));
                }
                state.is_new_high_score = true;
                state.high_score = state.score;
            }

            tick_notification(state, SIM_DT);

            if let Some(kind) = update_challenges(state, config) {
                events.push(GameEvent::Challenge(kind));
            }

            if state.balls.iter().any(|b| b.fell_below(config.height)) {
                state.phase = GamePhase::GameOver;
                events.push(GameEvent::RoundOver {
                    score: state.score,
                    new_high_score: state.is_new_high_score,
                });
                log::info!("Round over after {}s", state.score);
            }
        }

        GamePhase::GameOver => {}
    }

    events
}

/// Score is whole seconds since the round started
pub fn update_score(state: &mut GameState, now_ms: f64) {
    if let Some(start) = state.start_ms {
        let elapsed = ((now_ms - start) / 1000.0).floor();
        state.score = elapsed.max(0.0) as u32;
    }
}

/// Count the banner down and clear it when it runs out
pub fn tick_notification(state: &mut GameState, dt: f32) {
    if let Some(notification) = &mut state.notification {
        notification.timer -= dt;
        if notification.timer <= 0.0 {
            state.notification = None;
        }
    }
}

fn impact_color(impact: &Impact, config: &GameConfig) -> Color {
    match impact.kind {
        ImpactKind::Wall | ImpactKind::Ceiling => config.palette.wall_spark,
        ImpactKind::Barrier => config.palette.barrier,
        ImpactKind::Hand => config.palette.hand_spark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::autopilot::autopilot_hands;
    use glam::Vec2;

    fn running(seed: u64) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, seed);
        state.phase = GamePhase::Running;
        state.start_ms = Some(0.0);
        (state, config)
    }

    fn at(now_ms: f64) -> TickInput {
        TickInput {
            hands: None,
            now_ms,
        }
    }

    #[test]
    fn test_countdown_to_running() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        let ball_start = state.balls[0].pos;

        for _ in 0..179 {
            let events = tick(&mut state, &at(500.0), &config);
            assert!(events.is_empty());
        }
        assert_eq!(state.phase, GamePhase::Countdown);
        // Balls hold still during the countdown
        assert_eq!(state.balls[0].pos, ball_start);

        let mut finished = false;
        for _ in 0..3 {
            if tick(&mut state, &at(3500.0), &config).contains(&GameEvent::CountdownFinished) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.start_ms, Some(3500.0));
        assert_eq!(state.countdown, 0.0);
    }

    #[test]
    fn test_score_is_whole_seconds() {
        let (mut state, config) = running(1);
        tick(&mut state, &at(999.0), &config);
        assert_eq!(state.score, 0);
        tick(&mut state, &at(1000.0), &config);
        assert_eq!(state.score, 1);
        tick(&mut state, &at(2750.0), &config);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_high_score_updates_live() {
        let (mut state, config) = running(1);
        state.high_score = 1;

        let events = tick(&mut state, &at(1500.0), &config);
        assert!(events.is_empty());
        assert!(!state.is_new_high_score);

        let events = tick(&mut state, &at(2000.0), &config);
        assert_eq!(events, vec![GameEvent::NewHighScore(2)]);
        assert!(state.is_new_high_score);
        assert_eq!(state.high_score, 2);

        // Only announced once per round
        let events = tick(&mut state, &at(3000.0), &config);
        assert!(events.is_empty());
        assert_eq!(state.high_score, 3);
    }

    #[test]
    fn test_ball_lost_ends_round() {
        let (mut state, config) = running(1);
        state.balls[0].pos = Vec2::new(320.0, 495.0);
        state.balls[0].vel = Vec2::new(0.0, 6.0);

        let events = tick(&mut state, &at(4000.0), &config);
        assert_eq!(
            events,
            vec![
                GameEvent::NewHighScore(4),
                GameEvent::RoundOver {
                    score: 4,
                    new_high_score: true
                }
            ]
        );
        assert_eq!(state.phase, GamePhase::GameOver);

        // Simulation is halted
        let snapshot = state.balls.clone();
        let ticks = state.time_ticks;
        let input = TickInput {
            hands: Some(vec![Hand::new(1.0, 1.0)]),
            now_ms: 9000.0,
        };
        assert!(tick(&mut state, &input, &config).is_empty());
        assert_eq!(state.balls, snapshot);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, 4);
        assert!(state.hands.is_empty());
    }

    #[test]
    fn test_ball_touching_floor_is_not_lost() {
        let (mut state, config) = running(1);
        // Top edge still above the floor after the step
        state.balls[0].pos = Vec2::new(320.0, 480.0);
        state.balls[0].vel = Vec2::ZERO;
        tick(&mut state, &at(0.0), &config);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_hand_pops_ball() {
        let (mut state, config) = running(1);
        state.balls[0].pos = Vec2::new(320.0, 300.0);
        state.balls[0].vel = Vec2::new(0.0, 4.0);
        let input = TickInput {
            hands: Some(vec![Hand::new(320.0, 360.0)]),
            now_ms: 0.0,
        };

        tick(&mut state, &input, &config);
        assert_eq!(state.balls[0].vel.y, config.bounce_velocity);
        assert!((state.balls[0].pos.distance(Vec2::new(320.0, 360.0)) - 70.0).abs() < 1e-3);
        // Burst spawned at the contact
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_hands_replaced_wholesale() {
        let (mut state, config) = running(1);
        let input = TickInput {
            hands: Some(vec![
                Hand::new(10.0, 400.0),
                Hand::new(20.0, 400.0),
                Hand::new(30.0, 400.0),
            ]),
            now_ms: 0.0,
        };
        tick(&mut state, &input, &config);
        assert_eq!(state.hands.len(), MAX_HANDS);

        // No new detection: previous hands stay in effect
        tick(&mut state, &at(0.0), &config);
        assert_eq!(state.hands.len(), MAX_HANDS);

        // Empty detection clears them
        let input = TickInput {
            hands: Some(Vec::new()),
            now_ms: 0.0,
        };
        tick(&mut state, &input, &config);
        assert!(state.hands.is_empty());
    }

    #[test]
    fn test_challenge_fires_once_with_duplicate_tick() {
        let (mut state, config) = running(21);
        let mut seconds: Vec<u32> = (0..=30).collect();
        seconds.push(30);
        seconds.push(31);

        let mut challenges = 0;
        for s in seconds {
            // Keep the ball parked in the air
            state.balls.iter_mut().for_each(|b| {
                b.pos = Vec2::new(320.0, 100.0);
                b.vel = Vec2::ZERO;
            });
            let events = tick(&mut state, &at(s as f64 * 1000.0), &config);
            challenges += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Challenge(_)))
                .count();
        }

        assert_eq!(challenges, 1);
        assert_eq!(state.challenge_history.len(), 1);
        assert_eq!(state.challenge_history[0].score, 30);
    }

    #[test]
    fn test_notification_counts_down_and_clears() {
        let (mut state, config) = running(4);
        tick(&mut state, &at(30_000.0), &config);
        assert!(matches!(state.challenge_history.as_slice(), [r] if r.score == 30));
        let initial = state.notification.as_ref().map(|n| n.timer);
        assert_eq!(initial, Some(config.notification_secs));

        // No balls means nothing can be lost while we wait
        state.balls.clear();

        let mut last = config.notification_secs;
        let mut cleared_after = None;
        for i in 1..=200 {
            tick(&mut state, &at(30_500.0), &config);
            match &state.notification {
                Some(n) => {
                    assert!(n.timer < last);
                    assert!(n.timer > 0.0);
                    last = n.timer;
                }
                None => {
                    cleared_after = Some(i);
                    break;
                }
            }
        }

        let ticks = cleared_after.expect("notification never cleared");
        assert!((179..=181).contains(&ticks), "cleared after {ticks} ticks");
    }

    #[test]
    fn test_restart_after_challenges() {
        let (mut state, config) = running(8);
        for (i, kind) in ChallengeKind::ALL.iter().enumerate() {
            state.score = 30 * (i as u32 + 1);
            crate::sim::challenge::apply_challenge(&mut state, &config, *kind);
        }
        assert!(state.balls.len() > 1);
        assert!(!state.barriers.is_empty());
        assert!(state.gravity > config.gravity);

        state.restart(&config);
        assert_eq!(state.balls.len(), config.ball_count as usize);
        assert!(state.barriers.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.gravity, config.gravity);
        assert_eq!(state.phase, GamePhase::Countdown);
    }

    #[test]
    fn test_autopilot_survives() {
        let (mut state, config) = running(3);
        for i in 0..1200 {
            let input = TickInput {
                hands: Some(autopilot_hands(&state, &config)),
                now_ms: i as f64 * 1000.0 / 60.0,
            };
            tick(&mut state, &input, &config);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 19);
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs must produce identical rounds
        let config = GameConfig::default();
        let mut state1 = GameState::new(&config, 99999);
        let mut state2 = GameState::new(&config, 99999);

        for i in 0..2400 {
            let now_ms = i as f64 * 1000.0 / 60.0;
            let input1 = TickInput {
                hands: Some(autopilot_hands(&state1, &config)),
                now_ms,
            };
            let input2 = TickInput {
                hands: Some(autopilot_hands(&state2, &config)),
                now_ms,
            };
            let e1 = tick(&mut state1, &input1, &config);
            let e2 = tick(&mut state2, &input2, &config);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.barriers, state2.barriers);
        assert_eq!(state1.challenge_history, state2.challenge_history);
    }
}
