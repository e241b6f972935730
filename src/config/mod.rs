pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub commentary: CommentaryConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32, // Master gain on top of each tone's own volume
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    pub enabled: bool,
    // External generator as [program, args...]; empty uses the built-in phrasebook
    pub command: Vec<String>,
    pub timeout_ms: u64,
    pub progress_every: u32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: Vec::new(),
            timeout_ms: 4000,
            progress_every: 10,
        }
    }
}

impl CommentaryConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frame_ms: u64,
    pub decorations: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            decorations: 15,
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub best_score_path: Option<PathBuf>,
}
