#![warn(clippy::all, clippy::pedantic)]

use log::trace;
use ratatui::style::Color;

use crate::components::Particle;
use crate::game::{BURST_PARTICLES, BURST_SPREAD, PARTICLE_COLOR, PARTICLE_DECAY};

/// Burst of sparks celebrating a perfect placement, centred on `(x, y)`.
pub fn spawn_perfect_burst(rng: &mut fastrand::Rng, x: f64, y: f64) -> Vec<Particle> {
    trace!("Spawning perfect burst at ({x:.1}, {y:.1})");

    (0..BURST_PARTICLES)
        .map(|_| {
            // Uniform in [-BURST_SPREAD / 2, BURST_SPREAD / 2) on both axes
            let vx = (rng.f64() - 0.5) * BURST_SPREAD;
            let vy = (rng.f64() - 0.5) * BURST_SPREAD;
            spawn_particle(x, y, (vx, vy), PARTICLE_COLOR)
        })
        .collect()
}

/// Moves every particle one tick and drops the ones that burnt out.
/// Particles fly in straight lines; there is no gravity on them.
#[must_use]
pub fn update_particles(particles: Vec<Particle>) -> Vec<Particle> {
    particles
        .into_iter()
        .filter_map(|mut particle| {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.life -= PARTICLE_DECAY;
            (particle.life > 0.0).then_some(particle)
        })
        .collect()
}

// Helper function to build a single fresh particle
#[must_use]
pub fn spawn_particle(x: f64, y: f64, velocity: (f64, f64), color: Color) -> Particle {
    Particle {
        x,
        y,
        vx: velocity.0,
        vy: velocity.1,
        life: 1.0,
        color,
    }
}
