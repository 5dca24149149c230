use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use super::{StoreError, ValueStore};

/// Writes one worker's value store as a uniquely named snapshot, staged for a later merge into the
/// canonical store.
pub struct SnapshotPersistance {
    snapshot_directory: PathBuf,
    worker_id: String,
}

impl SnapshotPersistance {
    pub fn new(snapshot_directory: PathBuf, worker_id: String) -> Result<Self, StoreError> {
        fs::create_dir_all(&snapshot_directory)
            .map_err(|e| StoreError::io("create directory", &snapshot_directory, e))?;

        Ok(Self {
            snapshot_directory,
            worker_id,
        })
    }

    pub fn snapshot_directory(&self) -> &Path {
        &self.snapshot_directory
    }

    pub fn write(&self, store: &ValueStore, episode_id: &Uuid) -> Result<PathBuf, StoreError> {
        let file_path = self.generate_file_path(episode_id);
        store.save(&file_path)?;

        Ok(file_path)
    }

    fn generate_file_path(&self, episode_id: &Uuid) -> PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        self.snapshot_directory.join(format!(
            "{}_{}_{}.json",
            self.worker_id,
            episode_id.simple(),
            timestamp
        ))
    }
}
