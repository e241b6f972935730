use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::commentary::{Commentator, Verdict};
use crate::components::{Decoration, Input};
use crate::scenery::spawn_decorations;
use crate::simulation::{GameEvent, Simulation};
use crate::sound::{AudioState, tone_for};
use crate::store::BestScore;

/// When to ask for progress comments, and the last milestone commented on
#[derive(Resource, Debug, Clone)]
pub struct CommentaryPolicy {
    pub progress_every: u32,
    pub last_milestone: u32,
}

impl Default for CommentaryPolicy {
    fn default() -> Self {
        Self {
            progress_every: 10,
            last_milestone: 0,
        }
    }
}

/// How many decorations to seed on every start
#[derive(Resource, Debug, Clone, Copy)]
pub struct DecorationCount(pub usize);

pub fn input_system(world: &mut World) {
    // Take the input so each press fires once
    let input = std::mem::take(&mut *world.resource_mut::<Input>());

    if input.toggle_mute {
        world.resource_mut::<AudioState>().toggle_sound();
    }

    if input.action {
        let events = world.resource_mut::<Simulation>().press();
        dispatch_events(world, &events);
    }
}

pub fn game_tick_system(world: &mut World) {
    let events = world.resource_mut::<Simulation>().tick();
    dispatch_events(world, &events);
}

/// Background scenery moves in every state
pub fn decoration_system(world: &mut World) {
    for mut decoration in world.query::<&mut Decoration>().iter_mut(world) {
        decoration.drift();
    }
}

pub fn commentary_system(world: &mut World) {
    if let Some(mut commentator) = world.get_resource_mut::<Commentator>() {
        if commentator.poll() {
            debug!("Commentary updated");
        }
    }
}

/// Routes simulation events to the collaborators: tones, best score and
/// commentary. Nothing here feeds back into the simulation.
pub fn dispatch_events(world: &mut World, events: &[GameEvent]) {
    for event in events {
        if let Some(tone) = tone_for(event) {
            world.resource::<AudioState>().play_tone(tone);
        }

        match *event {
            GameEvent::Started => {
                let count = world
                    .get_resource::<DecorationCount>()
                    .map_or(0, |count| count.0);
                spawn_decorations(world, count);
                world.resource_mut::<CommentaryPolicy>().last_milestone = 0;
                if let Some(mut commentator) = world.get_resource_mut::<Commentator>() {
                    commentator.clear();
                }
            }
            GameEvent::Perfect { score, .. } | GameEvent::Partial { score } => {
                let milestone = {
                    let mut policy = world.resource_mut::<CommentaryPolicy>();
                    let milestone = score / policy.progress_every.max(1);
                    if milestone > policy.last_milestone {
                        policy.last_milestone = milestone;
                        Some(milestone)
                    } else {
                        None
                    }
                };
                if milestone.is_some() {
                    request_comment(world, score, Verdict::Progress);
                }
            }
            GameEvent::Collapsed { score } => {
                let new_best = world.resource_mut::<BestScore>().record(score);
                info!("Game over with score {score} (new best: {new_best})");
                let verdict = if new_best { Verdict::Win } else { Verdict::Fail };
                request_comment(world, score, verdict);
            }
            GameEvent::Dropped => {}
        }
    }
}

fn request_comment(world: &mut World, score: u32, verdict: Verdict) {
    if let Some(commentator) = world.get_resource::<Commentator>() {
        if !commentator.request(score, verdict) {
            debug!("Comment request for {verdict} at {score} not queued");
        }
    }
}
