use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::Path;

use common::write_json_atomic;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::StoreError;

pub type StateKey = String;
pub type ActionKey = String;

/// Every stored value lies within this range.
pub const VALUE_RANGE: RangeInclusive<f32> = -1.0..=1.0;

/// Empirical desirability of taking an action from a state, keyed by their canonical strings.
///
/// Persisted as a JSON object of state keys to objects of action keys to values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    values: HashMap<StateKey, HashMap<ActionKey, f32>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a persisted store. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut store: Self = read_json_or_default(path.as_ref(), "value store")?;

        for value in store.values.values_mut().flat_map(|actions| actions.values_mut()) {
            *value = clamp(*value, &VALUE_RANGE);
        }

        Ok(store)
    }

    /// Writes the store so concurrent readers see either the previous or the new contents.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        write_json_atomic(path, self).map_err(|e| StoreError::io("write", path, e))
    }

    /// The stored value, or `default` when either key is absent.
    pub fn get(&self, state_key: &str, action_key: &str, default: f32) -> f32 {
        self.values
            .get(state_key)
            .and_then(|actions| actions.get(action_key))
            .copied()
            .unwrap_or(default)
    }

    /// Values for each of `action_keys` in order, falling back to `default`.
    pub fn get_all<K>(&self, state_key: &str, action_keys: &[K], default: f32) -> Vec<f32>
    where
        K: AsRef<str>,
    {
        action_keys
            .iter()
            .map(|action_key| self.get(state_key, action_key.as_ref(), default))
            .collect()
    }

    /// Adds `delta` to the entry, treating a missing entry as zero, and clamps to `VALUE_RANGE`.
    ///
    /// A delta that is not finite is ignored.
    pub fn apply_delta(&mut self, state_key: &str, action_key: &str, delta: f32) {
        self.apply_delta_within(state_key, action_key, delta, VALUE_RANGE);
    }

    /// Same as `apply_delta` with a narrower clamp. The bounds are intersected with `VALUE_RANGE`;
    /// when the intersection is empty `VALUE_RANGE` is used instead.
    pub fn apply_delta_within(
        &mut self,
        state_key: &str,
        action_key: &str,
        delta: f32,
        bounds: RangeInclusive<f32>,
    ) {
        if !delta.is_finite() {
            warn!(
                "Ignoring non-finite delta {} for state {} action {}",
                delta, state_key, action_key
            );
            return;
        }

        let bounds = intersect_value_range(&bounds);

        self.values
            .entry(state_key.to_owned())
            .or_default()
            .entry(action_key.to_owned())
            .and_modify(|value| *value = clamp(*value + delta, &bounds))
            .or_insert_with(|| clamp(delta, &bounds));
    }

    /// Folds `source` into this store. States and actions only present in `source` are copied and
    /// values present in both become their clamped average.
    ///
    /// Averaging is not idempotent: merging the same source again moves the values further.
    pub fn merge(&mut self, source: &ValueStore) -> &mut Self {
        for (state_key, source_actions) in &source.values {
            match self.values.get_mut(state_key) {
                None => {
                    self.values.insert(state_key.clone(), source_actions.clone());
                }
                Some(actions) => {
                    for (action_key, &source_value) in source_actions {
                        actions
                            .entry(action_key.clone())
                            .and_modify(|value| {
                                *value = clamp((*value + source_value) / 2.0, &VALUE_RANGE)
                            })
                            .or_insert(source_value);
                    }
                }
            }
        }

        self
    }

    pub fn actions(&self, state_key: &str) -> Option<&HashMap<ActionKey, f32>> {
        self.values.get(state_key)
    }

    /// Number of states with at least one recorded action.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.values().flat_map(|actions| actions.values().copied())
    }
}

fn intersect_value_range(bounds: &RangeInclusive<f32>) -> RangeInclusive<f32> {
    let lower = bounds.start().max(*VALUE_RANGE.start());
    let upper = bounds.end().min(*VALUE_RANGE.end());

    if lower <= upper {
        lower..=upper
    } else {
        warn!(
            "Bounds {:?} do not overlap {:?}, clamping to the full range",
            bounds, VALUE_RANGE
        );
        VALUE_RANGE
    }
}

fn clamp(value: f32, bounds: &RangeInclusive<f32>) -> f32 {
    value.clamp(*bounds.start(), *bounds.end())
}

/// Reads a JSON file, or `T::default()` when the file does not exist.
pub fn read_json_or_default<T>(path: &Path, contents: &'static str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(StoreError::io("read", path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        contents,
        path: path.to_path_buf(),
        source,
    })
}
