use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{StoreError, ValueStore};

pub const DEFAULT_MAX_SNAPSHOTS: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Snapshots chosen for this cycle.
    pub selected: usize,
    pub merged: usize,
    /// Snapshots that could not be read or parsed. They are left on disk.
    pub skipped: usize,
    pub deleted: usize,
    pub delete_failed: usize,
    /// States in the canonical store after the merge.
    pub states: usize,
}

/// Folds up to `max_snapshots` snapshots from `snapshot_dir` into the canonical store.
///
/// When more snapshots are waiting a random subset is merged; the rest wait for a later cycle.
/// The canonical store is replaced atomically and only the snapshots that were merged are deleted
/// afterwards. A canonical store that cannot be read aborts the cycle without writing anything.
pub fn merge_batch<R>(
    canonical_path: &Path,
    snapshot_dir: &Path,
    max_snapshots: usize,
    rng: &mut R,
) -> Result<MergeReport, StoreError>
where
    R: Rng + ?Sized,
{
    merge_batch_with(canonical_path, snapshot_dir, max_snapshots, rng, |path| {
        fs::remove_file(path)
    })
}

/// `merge_batch` with the removal of consumed snapshots supplied by the caller. A snapshot that is
/// already gone counts as deleted; any other removal failure is logged and counted.
pub fn merge_batch_with<R, D>(
    canonical_path: &Path,
    snapshot_dir: &Path,
    max_snapshots: usize,
    rng: &mut R,
    mut remove_snapshot: D,
) -> Result<MergeReport, StoreError>
where
    R: Rng + ?Sized,
    D: FnMut(&Path) -> io::Result<()>,
{
    let mut canonical = ValueStore::load(canonical_path)?;
    let mut snapshots = list_snapshots(snapshot_dir, canonical_path)?;

    if snapshots.len() > max_snapshots {
        snapshots = snapshots
            .choose_multiple(rng, max_snapshots)
            .cloned()
            .collect();
    }

    let mut report = MergeReport {
        selected: snapshots.len(),
        ..Default::default()
    };

    if snapshots.is_empty() {
        report.states = canonical.len();
        return Ok(report);
    }

    let mut consumed = Vec::with_capacity(snapshots.len());

    for snapshot_path in snapshots {
        match ValueStore::load(&snapshot_path) {
            Ok(snapshot) => {
                canonical.merge(&snapshot);
                consumed.push(snapshot_path);
                report.merged += 1;
            }
            Err(e) => {
                warn!("Skipping snapshot {:?}: {}", snapshot_path, e);
                report.skipped += 1;
            }
        }
    }

    canonical.save(canonical_path)?;
    report.states = canonical.len();

    for snapshot_path in consumed {
        match remove_snapshot(snapshot_path.as_path()) {
            Ok(()) => report.deleted += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => report.deleted += 1,
            Err(e) => {
                warn!("Failed to delete merged snapshot {:?}: {}", snapshot_path, e);
                report.delete_failed += 1;
            }
        }
    }

    info!(
        "Merged {} of {} snapshots into {:?}, Skipped: {}, Delete Failures: {}, States: {}",
        report.merged,
        report.selected,
        canonical_path,
        report.skipped,
        report.delete_failed,
        report.states
    );

    Ok(report)
}

/// Snapshot files in `snapshot_dir`, sorted by name. The canonical store, hidden files (including
/// in-progress temporary writes) and non JSON files are excluded.
pub fn list_snapshots(
    snapshot_dir: &Path,
    canonical_path: &Path,
) -> Result<Vec<PathBuf>, StoreError> {
    let entries = match fs::read_dir(snapshot_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io("list", snapshot_dir, e)),
    };

    let canonical_path =
        fs::canonicalize(canonical_path).unwrap_or_else(|_| canonical_path.to_path_buf());

    let mut snapshots = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            let is_hidden = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);

            is_json && !is_hidden
        })
        .filter(|path| {
            let path = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            path != canonical_path
        })
        .collect::<Vec<_>>();

    snapshots.sort();

    Ok(snapshots)
}
