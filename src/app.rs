#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{info, warn};
use std::error;
use std::sync::Arc;

use crate::commentary::{CommandSource, CommentSource, Commentator, Phrasebook};
use crate::components::Input;
use crate::config::Config;
use crate::scenery::{SceneRng, spawn_decorations};
use crate::simulation::Simulation;
use crate::sound::AudioState;
use crate::store::{BestScore, FileScoreStore, MemoryScoreStore, ScoreStore};
use crate::systems::{
    CommentaryPolicy, DecorationCount, commentary_system, decoration_system, game_tick_system,
    input_system,
};

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
}

impl App {
    /// Builds a session and its collaborators from the configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let audio = if config.audio.enabled {
            let mut audio = AudioState::new();
            audio.set_volume(config.audio.volume);
            audio
        } else {
            AudioState::disabled()
        };

        let store: Box<dyn ScoreStore> = match config
            .storage
            .best_score_path
            .clone()
            .or_else(FileScoreStore::default_path)
        {
            Some(path) => Box::new(FileScoreStore::new(path)),
            None => {
                warn!("No data directory; best score is kept for this session only");
                Box::new(MemoryScoreStore::default())
            }
        };

        let commentator = if config.commentary.enabled {
            let source: Arc<dyn CommentSource> =
                match CommandSource::from_command(&config.commentary.command) {
                    Some(source) => Arc::new(source),
                    None => Arc::new(Phrasebook),
                };
            Commentator::new(source, config.commentary.timeout())
        } else {
            Commentator::disabled()
        };

        let policy = CommentaryPolicy {
            progress_every: config.commentary.progress_every,
            last_milestone: 0,
        };

        Self::from_parts(
            Simulation::default(),
            audio,
            BestScore::load(store),
            commentator,
            policy,
            config.display.decorations,
        )
    }

    /// Assembles an app from ready-made parts
    #[must_use]
    pub fn from_parts(
        simulation: Simulation,
        audio: AudioState,
        best: BestScore,
        commentator: Commentator,
        policy: CommentaryPolicy,
        decorations: usize,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(simulation);
        world.insert_resource(audio);
        world.insert_resource(best);
        world.insert_resource(commentator);
        world.insert_resource(policy);
        world.insert_resource(Input::default());
        world.insert_resource(SceneRng::default());
        world.insert_resource(DecorationCount(decorations));

        // Scenery is alive even before the first game
        spawn_decorations(&mut world, decorations);

        info!("App ready, best score {}", world.resource::<BestScore>().get());

        Self {
            world,
            should_quit: false,
        }
    }

    /// The single action: start, restart or drop
    pub fn press(&mut self) {
        self.world.resource_mut::<Input>().action = true;
    }

    pub fn toggle_mute(&mut self) {
        self.world.resource_mut::<Input>().toggle_mute = true;
    }

    /// One frame: apply input, advance the simulation, animate scenery and
    /// pick up finished comments.
    pub fn on_tick(&mut self) {
        input_system(&mut self.world);
        game_tick_system(&mut self.world);
        decoration_system(&mut self.world);
        commentary_system(&mut self.world);
    }

    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        self.world.resource::<Simulation>()
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.world.resource::<BestScore>().get()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
