use std::path::{Path, PathBuf};

use common::write_json_atomic;
use uuid::Uuid;

use super::store::read_json_or_default;
use super::{ActionKey, StateKey, StoreError};

/// The `(action, state)` pairs chosen during one game, in move order.
///
/// With a journal the history is mirrored to a JSON file after every change, so an agent that is
/// rebuilt for each turn can resume the running episode.
#[derive(Debug)]
pub struct Episode {
    id: Uuid,
    moves: Vec<(ActionKey, StateKey)>,
    journal: Option<PathBuf>,
}

impl Default for Episode {
    fn default() -> Self {
        Self::new()
    }
}

impl Episode {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            moves: Vec::new(),
            journal: None,
        }
    }

    /// Resumes the history stored at `journal`, or starts an empty one if the file is missing.
    pub fn with_journal(journal: impl AsRef<Path>) -> Result<Self, StoreError> {
        let journal = journal.as_ref();
        let moves = read_json_or_default(journal, "episode history")?;

        Ok(Self {
            id: Uuid::new_v4(),
            moves,
            journal: Some(journal.to_path_buf()),
        })
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn moves(&self) -> &[(ActionKey, StateKey)] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn record_move(
        &mut self,
        action_key: ActionKey,
        state_key: StateKey,
    ) -> Result<(), StoreError> {
        self.moves.push((action_key, state_key));
        self.write_journal()
    }

    /// Forgets the recorded moves and starts a new episode id.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.moves.clear();
        self.id = Uuid::new_v4();
        self.write_journal()
    }

    fn write_journal(&self) -> Result<(), StoreError> {
        match &self.journal {
            Some(journal) => write_json_atomic(journal, &self.moves)
                .map_err(|e| StoreError::io("write", journal, e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_moves_are_kept_in_order() {
        let mut episode = Episode::new();

        episode.record_move("a1".to_string(), "s1".to_string()).unwrap();
        episode.record_move("a2".to_string(), "s2".to_string()).unwrap();

        assert_eq!(
            episode.moves(),
            &[
                ("a1".to_string(), "s1".to_string()),
                ("a2".to_string(), "s2".to_string())
            ]
        );
    }

    #[test]
    fn test_journal_survives_reconstruction() {
        let dir = tempfile::tempdir().unwrap();
        let journal = dir.path().join("action_cache.json");

        let mut episode = Episode::with_journal(&journal).unwrap();
        assert!(episode.is_empty());
        episode.record_move("a1".to_string(), "s1".to_string()).unwrap();

        let mut resumed = Episode::with_journal(&journal).unwrap();
        resumed.record_move("a2".to_string(), "s2".to_string()).unwrap();

        assert_eq!(resumed.len(), 2);
        assert_eq!(
            fs::read_to_string(&journal).unwrap(),
            r#"[["a1","s1"],["a2","s2"]]"#
        );
    }

    #[test]
    fn test_clear_empties_journal_and_renews_id() {
        let dir = tempfile::tempdir().unwrap();
        let journal = dir.path().join("action_cache.json");
        let mut episode = Episode::with_journal(&journal).unwrap();
        episode.record_move("a1".to_string(), "s1".to_string()).unwrap();
        let id = *episode.id();

        episode.clear().unwrap();

        assert!(episode.is_empty());
        assert_ne!(*episode.id(), id);
        assert!(Episode::with_journal(&journal).unwrap().is_empty());
    }
}
