use std::path::PathBuf;

use log::{debug, info};

use super::{ActionKey, Episode, SnapshotPersistance, StateKey, StoreError, ValueStore};

pub const DEFAULT_REWARD_INCREMENT: f32 = 0.01;
pub const DEFAULT_MIN_HISTORY: usize = 2;

/// Turns the outcome of an episode into a snapshot of updated values.
///
/// The canonical store is only read here. Updates go to a new snapshot per result so concurrent
/// workers never write the same file.
pub struct ExperienceRecorder {
    canonical_path: PathBuf,
    snapshots: SnapshotPersistance,
    reward_increment: f32,
    min_history: usize,
}

impl ExperienceRecorder {
    pub fn new(canonical_path: PathBuf, snapshots: SnapshotPersistance) -> Self {
        Self {
            canonical_path,
            snapshots,
            reward_increment: DEFAULT_REWARD_INCREMENT,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }

    pub fn with_reward_increment(mut self, reward_increment: f32) -> Self {
        self.reward_increment = reward_increment;
        self
    }

    /// Episodes with `min_history` moves or fewer are not recorded.
    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn record_move(
        &self,
        episode: &mut Episode,
        action_key: ActionKey,
        state_key: StateKey,
    ) -> Result<(), StoreError> {
        episode.record_move(action_key, state_key)
    }

    /// Rewards (or penalizes) every move of the episode, writes the result as a snapshot and
    /// clears the episode. Returns the snapshot path, or `None` when the episode was too short to
    /// record.
    pub fn record_result(
        &self,
        episode: &mut Episode,
        win: bool,
    ) -> Result<Option<PathBuf>, StoreError> {
        if episode.len() <= self.min_history {
            debug!(
                "Episode has {} moves, not recording the result",
                episode.len()
            );
            episode.clear()?;
            return Ok(None);
        }

        let mut store = ValueStore::load(&self.canonical_path)?;
        apply_result(&mut store, episode.moves(), win, self.reward_increment);

        let snapshot_path = self.snapshots.write(&store, episode.id())?;

        info!(
            "Recorded {} for {} moves to {:?}",
            if win { "win" } else { "loss" },
            episode.len(),
            snapshot_path
        );

        episode.clear()?;

        Ok(Some(snapshot_path))
    }
}

/// Adds `reward_increment` to every move on a win and subtracts it on a loss.
pub fn apply_result(
    store: &mut ValueStore,
    moves: &[(ActionKey, StateKey)],
    win: bool,
    reward_increment: f32,
) {
    let delta = if win {
        reward_increment
    } else {
        -reward_increment
    };

    for (action_key, state_key) in moves {
        store.apply_delta(state_key, action_key, delta);
    }
}
