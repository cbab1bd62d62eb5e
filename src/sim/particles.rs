//! Particle bursts for visual feedback

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Particle};
use crate::consts::*;

/// Append `count` particles at `pos` with random spread, decay and size
///
/// When `max_particles` would be exceeded the oldest particles are dropped.
pub fn spawn_burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    pos: Vec2,
    color: Color,
    count: usize,
    max_particles: usize,
) {
    for _ in 0..count {
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
        );
        particles.push(Particle {
            pos,
            vel,
            life: 1.0,
            decay: rng.random_range(PARTICLE_MIN_DECAY..PARTICLE_MAX_DECAY),
            size: rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE),
            color,
            gravity: PARTICLE_GRAVITY,
        });
    }

    if particles.len() > max_particles {
        let excess = particles.len() - max_particles;
        particles.drain(..excess);
    }
}

/// Advance one tick and drop particles whose life ran out
pub fn tick_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += particle.gravity;
        particle.life -= particle.decay;
    }
    particles.retain(|p| p.life > 0.0);
}
