use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use common::{Config, ConfigLoader};
use experience::{DEFAULT_MIN_HISTORY, DEFAULT_REWARD_INCREMENT};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AgentOptions {
    pub alpha: f32,
    pub default_value: f32,
    pub reward_increment: f32,
    pub min_history: usize,
    /// `None` deepens until the move time runs out or the game tree is exhausted.
    pub max_depth: Option<usize>,
    pub opening_plies: usize,
    pub move_time: Option<Duration>,
    pub worker_id: String,
    pub canonical_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub journal_path: Option<PathBuf>,
    pub opening_book_path: Option<PathBuf>,
}

impl Config for AgentOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let options = Self {
            alpha: config
                .get("alpha")
                .and_then(|v| v.as_f32())
                .unwrap_or(0.2),
            default_value: config
                .get("default_value")
                .and_then(|v| v.as_f32())
                .unwrap_or(0.1),
            reward_increment: config
                .get("reward_increment")
                .and_then(|v| v.as_f32())
                .unwrap_or(DEFAULT_REWARD_INCREMENT),
            min_history: config
                .get("min_history")
                .and_then(|v| v.as_usize())
                .unwrap_or(DEFAULT_MIN_HISTORY),
            max_depth: match config.get("max_depth").and_then(|v| v.as_usize()) {
                Some(0) => None,
                Some(max_depth) => Some(max_depth),
                None => Some(4),
            },
            opening_plies: config
                .get("opening_plies")
                .and_then(|v| v.as_usize())
                .unwrap_or(4),
            move_time: config
                .get("move_time_ms")
                .and_then(|v| v.as_usize())
                .map(|ms| Duration::from_millis(ms as u64)),
            worker_id: config
                .get("worker_id")
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| std::process::id().to_string()),
            canonical_path: config.get_relative_path_or("canonical_path", "q/q.json")?,
            snapshot_dir: config.get_relative_path_or("snapshot_dir", "q")?,
            journal_path: optional_path(config, "journal_path")?,
            opening_book_path: optional_path(config, "opening_book_path")?,
        };

        options.validate()?;

        Ok(options)
    }
}

impl AgentOptions {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("default_value", self.default_value),
            ("reward_increment", self.reward_increment),
        ] {
            ensure!(value.is_finite(), "Config option {} must be finite, got {}", name, value);
        }

        // Every JSON file directly inside the snapshot directory is merged as a snapshot.
        if let Some(journal_path) = &self.journal_path {
            ensure!(
                journal_path.parent() != Some(self.snapshot_dir.as_path()),
                "journal_path {:?} must not be inside snapshot_dir {:?}",
                journal_path,
                self.snapshot_dir
            );
        }

        Ok(())
    }
}

fn optional_path(config: &ConfigLoader, name: &str) -> Result<Option<PathBuf>> {
    match config.get(name) {
        Some(_) => Ok(Some(config.get_relative_path(name)?)),
        None => Ok(None),
    }
}
