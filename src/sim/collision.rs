//! Collision detection and response
//!
//! Two shapes matter: axis-aligned barriers (closest-point test) and circular
//! hand zones (center distance test). Responses always leave the ball tangent
//! to the shape it hit so the same contact cannot re-trigger next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Barrier, Hand};
use crate::config::GameConfig;
use crate::consts::HAND_NUDGE_FACTOR;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the shape surface (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing toward the ball center
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// What a ball touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactKind {
    /// Left or right screen edge
    Wall,
    /// Top screen edge
    Ceiling,
    Barrier,
    Hand,
}

/// A contact point, consumed by the loop to spawn particle bursts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub pos: Vec2,
    pub kind: ImpactKind,
}

/// Which side of a barrier was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Check a ball against a barrier
///
/// Returns the nearest edge to the ball center when the box's closest point
/// lies within the ball radius. Ties resolve left, right, top, bottom.
pub fn ball_barrier_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    barrier: &Barrier,
) -> Option<(BarrierEdge, Vec2)> {
    let min = barrier.min();
    let max = barrier.max();
    let closest = ball_pos.clamp(min, max);

    if ball_pos.distance(closest) >= ball_radius {
        return None;
    }

    let candidates = [
        (BarrierEdge::Left, (ball_pos.x - min.x).abs()),
        (BarrierEdge::Right, (ball_pos.x - max.x).abs()),
        (BarrierEdge::Top, (ball_pos.y - min.y).abs()),
        (BarrierEdge::Bottom, (ball_pos.y - max.y).abs()),
    ];

    let mut edge = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < edge.1 {
            edge = *candidate;
        }
    }

    Some((edge.0, closest))
}

/// Bounce a ball off a barrier, damping the reflected component
///
/// Returns the contact point when a collision was resolved.
pub fn resolve_barrier(ball: &mut Ball, barrier: &Barrier, damping: f32) -> Option<Vec2> {
    let (edge, contact) = ball_barrier_collision(ball.pos, ball.radius, barrier)?;
    let min = barrier.min();
    let max = barrier.max();

    match edge {
        BarrierEdge::Left => {
            ball.vel.x = -ball.vel.x * damping;
            ball.pos.x = min.x - ball.radius;
        }
        BarrierEdge::Right => {
            ball.vel.x = -ball.vel.x * damping;
            ball.pos.x = max.x + ball.radius;
        }
        BarrierEdge::Top => {
            ball.vel.y = -ball.vel.y * damping;
            ball.pos.y = min.y - ball.radius;
        }
        BarrierEdge::Bottom => {
            ball.vel.y = -ball.vel.y * damping;
            ball.pos.y = max.y + ball.radius;
        }
    }

    Some(contact)
}

/// Resolve every ball against every barrier, in collection order
pub fn resolve_barriers(balls: &mut [Ball], barriers: &[Barrier], damping: f32) -> Vec<Impact> {
    let mut impacts = Vec::new();
    for ball in balls.iter_mut() {
        for barrier in barriers {
            if let Some(pos) = resolve_barrier(ball, barrier, damping) {
                impacts.push(Impact {
                    pos,
                    kind: ImpactKind::Barrier,
                });
            }
        }
    }
    impacts
}

/// Check a ball against a circular hand zone
pub fn ball_hand_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    hand_pos: Vec2,
    hand_radius: f32,
) -> CollisionResult {
    let offset = ball_pos - hand_pos;
    let distance = offset.length();
    let combined = ball_radius + hand_radius;

    if distance >= combined {
        return CollisionResult::miss();
    }

    // Coincident centers push straight up
    let normal = offset.try_normalize().unwrap_or(Vec2::NEG_Y);
    CollisionResult {
        hit: true,
        point: hand_pos + normal * hand_radius,
        normal,
        penetration: combined - distance,
    }
}

/// Pop a ball off a hand
///
/// Vertical velocity is overwritten with `bounce_velocity`, off-center hits add
/// horizontal spin, and the ball is moved out to the combined radius.
pub fn resolve_hand(
    ball: &mut Ball,
    hand: &Hand,
    hand_radius: f32,
    bounce_velocity: f32,
) -> Option<Vec2> {
    let result = ball_hand_collision(ball.pos, ball.radius, hand.pos, hand_radius);
    if !result.hit {
        return None;
    }

    let dx = ball.pos.x - hand.pos.x;
    ball.vel.y = bounce_velocity;
    ball.vel.x += dx * HAND_NUDGE_FACTOR;
    // Push out along the normal to the combined radius
    ball.pos += result.normal * result.penetration;

    Some(result.point)
}

/// Resolve every (ball, hand) pair; later hands overwrite earlier ones
pub fn resolve_hands(balls: &mut [Ball], hands: &[Hand], config: &GameConfig) -> Vec<Impact> {
    let mut impacts = Vec::new();
    for ball in balls.iter_mut() {
        for hand in hands {
            if let Some(pos) = resolve_hand(ball, hand, config.hand_radius, config.bounce_velocity)
            {
                impacts.push(Impact {
                    pos,
                    kind: ImpactKind::Hand,
                });
            }
        }
    }
    impacts
}
