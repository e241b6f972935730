#![warn(clippy::all, clippy::pedantic)]

//! The per-frame simulation of one play session.
//!
//! All mutable game state lives in [`Simulation`]; it is advanced only by
//! [`Simulation::tick`] and [`Simulation::press`], and read by the renderer
//! through [`Simulation::snapshot`]. Collaborators (audio, best score,
//! commentary) react to the returned [`GameEvent`]s and never feed back.

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::f64::consts::TAU;

use crate::components::{ActiveBlock, Camera, Particle, ScreenShake, SettledBlock};
use crate::game::{PERFECT_SHAKE, theme_for_score};
use crate::particles::{spawn_perfect_burst, update_particles};
use crate::resolver::{Placement, Tally, resolve};
use crate::state::{Command, GameStatus};

/// Something that happened during a press or tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh tower was seeded
    Started,
    /// The active block was released
    Dropped,
    /// Perfect placement. `streak_before` is the combo it extended.
    Perfect {
        streak_before: u32,
        combo: u32,
        score: u32,
    },
    /// Trimmed placement; the combo is back to zero
    Partial { score: u32 },
    /// The block missed and the session is over
    Collapsed { score: u32 },
}

/// Read-only view of everything the renderer draws
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tower: &'a [SettledBlock],
    pub active: Option<&'a ActiveBlock>,
    pub particles: &'a [Particle],
    pub camera_y: f64,
    pub shake: f64,
    pub score: u32,
    pub combo: u32,
    pub status: GameStatus,
}

#[derive(Resource, Debug, Clone)]
pub struct Simulation {
    tower: Vec<SettledBlock>,
    active: Option<ActiveBlock>,
    particles: Vec<Particle>,
    camera: Camera,
    shake: ScreenShake,
    tally: Tally,
    status: GameStatus,
    rng: fastrand::Rng,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(fastrand::u64(..))
    }
}

impl Simulation {
    /// An idle session whose randomness is fully determined by `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            tower: Vec::new(),
            active: None,
            particles: Vec::new(),
            camera: Camera::default(),
            shake: ScreenShake::default(),
            tally: Tally::default(),
            status: GameStatus::Idle,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// The single player action: start/restart, or drop while playing.
    pub fn press(&mut self) -> Vec<GameEvent> {
        let falling = self.active.as_ref().map(|active| active.is_falling);
        match self.status.command(falling) {
            Command::Start => self.start(),
            Command::Drop => self.drop_active(),
            Command::Ignore => Vec::new(),
        }
    }

    /// Resets the session to a lone foundation and a fresh active block.
    pub fn start(&mut self) -> Vec<GameEvent> {
        let foundation = SettledBlock::foundation(theme_for_score(0).primary);

        self.tower.clear();
        self.tower.push(foundation);
        self.particles.clear();
        self.camera = Camera::default();
        self.shake = ScreenShake::default();
        self.tally = Tally::default();
        self.status = GameStatus::Playing;
        self.active = Some(self.spawn_active(&foundation));

        info!("New tower started");
        vec![GameEvent::Started]
    }

    fn drop_active(&mut self) -> Vec<GameEvent> {
        match self.active.as_mut() {
            Some(active) => {
                if active.release() {
                    debug!("Block dropped at x={:.1}", active.x);
                    vec![GameEvent::Dropped]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }

    /// Advances the session by exactly one frame.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.status.simulates() {
            return events;
        }

        self.camera.ease();
        self.shake.decay();

        if let (Some(mut active), Some(top)) = (self.active.take(), self.tower.last().copied()) {
            active.advance(&top);
            if active.is_falling && active.has_landed_on(&top) {
                self.settle(&active, &top, &mut events);
            } else {
                self.active = Some(active);
            }
        }

        self.particles = update_particles(std::mem::take(&mut self.particles));
        events
    }

    fn settle(&mut self, active: &ActiveBlock, top: &SettledBlock, events: &mut Vec<GameEvent>) {
        let placement = resolve(active, top);
        let streak_before = self.tally.combo;
        self.tally.record(&placement);

        let block = match placement {
            Placement::Collapse => {
                self.status = GameStatus::GameOver;
                info!("Tower collapsed with score {}", self.tally.score);
                events.push(GameEvent::Collapsed {
                    score: self.tally.score,
                });
                return;
            }
            Placement::Perfect(block) => {
                self.shake.trigger(PERFECT_SHAKE);
                let burst = spawn_perfect_burst(&mut self.rng, block.center_x(), block.y);
                self.particles.extend(burst);
                events.push(GameEvent::Perfect {
                    streak_before,
                    combo: self.tally.combo,
                    score: self.tally.score,
                });
                block
            }
            Placement::Partial(block) => {
                events.push(GameEvent::Partial {
                    score: self.tally.score,
                });
                block
            }
        };
        debug!(
            "Placed block x={:.1} width={:.1} score={} combo={}",
            block.x, block.width, self.tally.score, self.tally.combo
        );

        self.tower.push(block);
        self.camera.follow(self.tower.len());
        self.active = Some(self.spawn_active(&block));
    }

    fn spawn_active(&mut self, top: &SettledBlock) -> ActiveBlock {
        let phase = self.rng.f64() * TAU;
        ActiveBlock::spawn(top, self.tally.score, phase)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tower: &self.tower,
            active: self.active.as_ref(),
            particles: &self.particles,
            camera_y: self.camera.current_y,
            shake: self.shake.magnitude,
            score: self.tally.score,
            combo: self.tally.combo,
            status: self.status,
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.tally.score
    }

    #[must_use]
    pub fn combo(&self) -> u32 {
        self.tally.combo
    }

    #[must_use]
    pub fn tower(&self) -> &[SettledBlock] {
        &self.tower
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn shake(&self) -> ScreenShake {
        self.shake
    }

    #[cfg(test)]
    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveBlock> {
        self.active.as_mut()
    }
}
