#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod camera;
pub mod commentary;
pub mod components;
pub mod config;
pub mod game;
pub mod particles;
pub mod physics;
pub mod resolver;
pub mod scenery;
pub mod scheduler;
pub mod screenshake;
pub mod simulation;
pub mod sound;
pub mod state;
pub mod store;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

pub use scheduler::{FrameClock, ManualScheduler, Scheduler};
pub use simulation::{GameEvent, Simulation, Snapshot};
pub use state::GameStatus;
