#![warn(clippy::all, clippy::pedantic)]

use log::trace;

use crate::components::ScreenShake;
use crate::game::SHAKE_DECAY;

// Below this the shake is imperceptible and snaps to rest
const REST_THRESHOLD: f64 = 0.01;

impl ScreenShake {
    /// Starts a shake at the given magnitude, replacing any shake in progress
    pub fn trigger(&mut self, magnitude: f64) {
        self.magnitude = magnitude;
        trace!("Screen shake triggered with magnitude {magnitude}");
    }

    /// Geometric decay applied once per tick
    pub fn decay(&mut self) {
        if self.magnitude <= 0.0 {
            return;
        }
        self.magnitude *= SHAKE_DECAY;
        if self.magnitude < REST_THRESHOLD {
            self.magnitude = 0.0;
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.magnitude > 0.0
    }

    /// Random offset for the renderer, in world units, within half the
    /// magnitude on each axis. Not part of the simulation state.
    pub fn jitter(&self, rng: &mut fastrand::Rng) -> (f64, f64) {
        if !self.is_active() {
            return (0.0, 0.0);
        }
        (
            (rng.f64() - 0.5) * self.magnitude,
            (rng.f64() - 0.5) * self.magnitude,
        )
    }
}
