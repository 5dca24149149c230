use std::collections::HashMap;
use std::path::Path;

use engine::{CanonicalKeys, ValidActions};
use experience::{read_json_or_default, ActionKey, StateKey, StoreError};
use serde::{Deserialize, Serialize};

/// Fixed replies for early positions, stored as a JSON map of StateKey to ActionKey.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct OpeningBook {
    entries: HashMap<StateKey, ActionKey>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// An absent book file is an empty book.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        read_json_or_default(path.as_ref(), "opening book")
    }

    pub fn insert(&mut self, state_key: StateKey, action_key: ActionKey) {
        self.entries.insert(state_key, action_key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The book action for `game_state` if it has one and the action is legal in the position.
    pub fn lookup<E>(&self, engine: &E, game_state: &E::State) -> Option<E::Action>
    where
        E: ValidActions + CanonicalKeys,
    {
        let action_key = self.entries.get(&engine.state_key(game_state))?;

        engine
            .valid_actions(game_state)
            .into_iter()
            .find(|action| engine.action_key(action) == *action_key)
    }
}
