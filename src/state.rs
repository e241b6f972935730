#![warn(clippy::all, clippy::pedantic)]

//! Lifecycle of a session: idle, playing, game over and back.

/// Current phase of the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    /// Nothing simulated yet, waiting for the first start
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Tower collapsed, waiting for a restart
    GameOver,
}

/// What the single input action means in the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Drop,
    Ignore,
}

impl GameStatus {
    /// Maps the action to a command. `active_falling` is `None` when there is
    /// no active block, so a drop can fire at most once per block.
    #[must_use]
    pub fn command(self, active_falling: Option<bool>) -> Command {
        match (self, active_falling) {
            (GameStatus::Idle | GameStatus::GameOver, _) => Command::Start,
            (GameStatus::Playing, Some(false)) => Command::Drop,
            (GameStatus::Playing, _) => Command::Ignore,
        }
    }

    /// Whether tower physics, particles and camera advance in this state
    #[must_use]
    pub fn simulates(self) -> bool {
        self == GameStatus::Playing
    }
}
