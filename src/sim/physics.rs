//! Ball integration and boundary response
//!
//! One call advances every ball by exactly one tick. Barriers are resolved
//! before screen edges so the edge clamp always has the final word.

use glam::Vec2;

use super::collision::{Impact, ImpactKind, resolve_barriers};
use super::state::{Ball, GameState};
use crate::config::GameConfig;

/// Advance all balls one tick: gravity, Euler step, barriers, then edges
pub fn step_balls(state: &mut GameState, config: &GameConfig) -> Vec<Impact> {
    let gravity = state.gravity;
    for ball in state.balls.iter_mut() {
        integrate(ball, gravity);
    }

    let mut impacts = resolve_barriers(&mut state.balls, &state.barriers, config.barrier_damping);

    for ball in state.balls.iter_mut() {
        impacts.extend(bounce_off_edges(ball, config.width));
    }

    impacts
}

/// Apply gravity then move by velocity
#[inline]
pub fn integrate(ball: &mut Ball, gravity: f32) {
    ball.vel.y += gravity;
    ball.pos += ball.vel;
}

/// Reflect off the side and top edges, clamping tangent to the edge
///
/// The bottom edge is open: falling through it ends the round.
pub fn bounce_off_edges(ball: &mut Ball, width: f32) -> Vec<Impact> {
    let mut impacts = Vec::new();

    if ball.pos.x - ball.radius < 0.0 {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.radius;
        impacts.push(Impact {
            pos: Vec2::new(0.0, ball.pos.y),
            kind: ImpactKind::Wall,
        });
    } else if ball.pos.x + ball.radius > width {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = width - ball.radius;
        impacts.push(Impact {
            pos: Vec2::new(width, ball.pos.y),
            kind: ImpactKind::Wall,
        });
    }

    if ball.pos.y - ball.radius < 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.radius;
        impacts.push(Impact {
            pos: Vec2::new(ball.pos.x, 0.0),
            kind: ImpactKind::Ceiling,
        });
    }

    impacts
}
