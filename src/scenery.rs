#![warn(clippy::all, clippy::pedantic)]

//! Birds and stars drifting behind the tower.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::{Decoration, DecorationKind};
use crate::game::{CANVAS_HEIGHT, CANVAS_WIDTH};

// Birds leave on the right and come back on the left
const WRAP_MARGIN: f64 = 50.0;
const BIRD_CHANCE: f64 = 0.3;

/// Randomness for cosmetic effects that are not part of the simulation
#[derive(Resource, Debug, Clone)]
pub struct SceneRng(pub fastrand::Rng);

impl Default for SceneRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

impl Decoration {
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        let x = rng.f64() * CANVAS_WIDTH;
        let y = rng.f64() * CANVAS_HEIGHT * 2.0 - CANVAS_HEIGHT;
        let kind = if rng.f64() < BIRD_CHANCE {
            DecorationKind::Bird
        } else {
            DecorationKind::Star
        };
        Self {
            x,
            y,
            kind,
            speed: 0.5 + rng.f64() * 1.5,
            size: 1.0 + rng.f64() * 3.0,
        }
    }

    /// One tick of motion. Stars hold still; birds fly right and wrap.
    pub fn drift(&mut self) {
        if self.kind != DecorationKind::Bird {
            return;
        }
        self.x += self.speed;
        if self.x > CANVAS_WIDTH + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }
    }
}

/// Replaces every decoration in the world with `count` fresh ones
pub fn spawn_decorations(world: &mut World, count: usize) {
    let existing: Vec<Entity> = world
        .query_filtered::<Entity, With<Decoration>>()
        .iter(world)
        .collect();
    for entity in existing {
        world.despawn(entity);
    }

    let decorations: Vec<Decoration> = {
        let mut rng = world.get_resource_or_insert_with(SceneRng::default);
        (0..count).map(|_| Decoration::random(&mut rng.0)).collect()
    };
    trace!("Spawning {} decorations", decorations.len());
    for decoration in decorations {
        world.spawn(decoration);
    }
}
