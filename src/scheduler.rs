#![warn(clippy::all, clippy::pedantic)]

//! Frame pacing, kept apart from the simulation so tests can step it by hand.

use std::time::{Duration, Instant};

/// Maximum catch-up steps per call before older lag is discarded
pub const MAX_CATCH_UP: u32 = 5;

pub trait Scheduler {
    /// Runs `step` once for every frame that is due and returns how many ran.
    fn tick(&mut self, step: &mut dyn FnMut()) -> u32;
}

/// Real-time fixed-step scheduler
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    lag: Duration,
    last_update: Instant,
}

impl FrameClock {
    #[must_use]
    pub fn new(frame: Duration) -> Self {
        Self {
            frame: frame.max(Duration::from_millis(1)),
            lag: Duration::default(),
            last_update: Instant::now(),
        }
    }

    /// Time left until the next frame is due
    #[must_use]
    pub fn until_next(&self) -> Duration {
        let pending = self.lag + self.last_update.elapsed();
        self.frame.saturating_sub(pending)
    }
}

impl Scheduler for FrameClock {
    fn tick(&mut self, step: &mut dyn FnMut()) -> u32 {
        let now = Instant::now();
        self.lag += now.duration_since(self.last_update);
        self.last_update = now;

        let mut ran = 0;
        while self.lag >= self.frame && ran < MAX_CATCH_UP {
            step();
            self.lag -= self.frame;
            ran += 1;
        }
        if ran == MAX_CATCH_UP {
            // Fell too far behind: drop the backlog instead of spiralling
            self.lag = self.lag.min(self.frame);
        }
        ran
    }
}

/// Scheduler advanced explicitly, one queued frame per step
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: u32,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, frames: u32) {
        self.pending += frames;
    }
}

impl Scheduler for ManualScheduler {
    fn tick(&mut self, step: &mut dyn FnMut()) -> u32 {
        let ran = self.pending;
        for _ in 0..ran {
            step();
        }
        self.pending = 0;
        ran
    }
}
