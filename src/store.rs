#![warn(clippy::all, clippy::pedantic)]

//! Best score persistence.

use anyhow::{Context, Result};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Sender, unbounded};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

const BEST_SCORE_FILE: &str = "best_score.toml";

pub trait ScoreStore: Send + Sync {
    fn load_best(&self) -> Result<u32>;
    fn save_best(&self, score: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u32,
}

/// Keeps the best score in a small TOML file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user data location, if the platform has one
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("tower-builder").join(BEST_SCORE_FILE))
    }
}

impl ScoreStore for FileScoreStore {
    fn load_best(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let file: BestScoreFile = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(file.best_score)
    }

    fn save_best(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(&BestScoreFile { best_score: score })?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Session-only store, forgotten on exit
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: Mutex<u32>,
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&self) -> Result<u32> {
        let best = self
            .best
            .lock()
            .map_err(|_| anyhow::anyhow!("score store poisoned"))?;
        Ok(*best)
    }

    fn save_best(&self, score: u32) -> Result<()> {
        let mut best = self
            .best
            .lock()
            .map_err(|_| anyhow::anyhow!("score store poisoned"))?;
        *best = score;
        Ok(())
    }
}

/// The best score, read once at startup and written only when beaten.
/// Writes happen on a background thread so a slow disk never holds up a
/// frame; dropping the resource waits for queued writes to finish.
#[derive(Resource)]
pub struct BestScore {
    store: Arc<dyn ScoreStore>,
    writer: Option<Sender<u32>>,
    worker: Option<JoinHandle<()>>,
    best: u32,
}

impl BestScore {
    /// Loads the stored best. An unreadable store counts as zero.
    #[must_use]
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let store: Arc<dyn ScoreStore> = Arc::from(store);
        let best = store.load_best().unwrap_or_else(|e| {
            warn!("Best score unavailable, starting from 0: {e:#}");
            0
        });

        let (writer, requests) = unbounded::<u32>();
        let worker_store = Arc::clone(&store);
        let spawned = thread::Builder::new()
            .name("best-score".into())
            .spawn(move || {
                while let Ok(score) = requests.recv() {
                    save(worker_store.as_ref(), score);
                }
            });

        match spawned {
            Ok(worker) => Self {
                store,
                writer: Some(writer),
                worker: Some(worker),
                best,
            },
            Err(e) => {
                warn!("Could not start best score writer, saving inline: {e}");
                Self {
                    store,
                    writer: None,
                    worker: None,
                    best,
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        self.best
    }

    /// Records a finished session. Returns true for a new best. The write is
    /// queued; a failed write is logged and the best is still kept for this
    /// session.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        let queued = self
            .writer
            .as_ref()
            .is_some_and(|writer| writer.send(score).is_ok());
        if !queued {
            save(self.store.as_ref(), score);
        }
        true
    }
}

fn save(store: &dyn ScoreStore, score: u32) {
    match store.save_best(score) {
        Ok(()) => info!("New best score {score} saved"),
        Err(e) => warn!("Could not save best score {score}: {e:#}"),
    }
}

impl Drop for BestScore {
    fn drop(&mut self) {
        // Closing the channel ends the writer once the queue is empty
        self.writer.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Best score writer panicked");
            }
        }
    }
}

impl Default for BestScore {
    fn default() -> Self {
        Self::load(Box::new(MemoryScoreStore::default()))
    }
}
