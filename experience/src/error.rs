use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing persisted experience. A missing file is never an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to {operation} {path:?}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} does not contain valid {contents}: {source}")]
    Corrupt {
        contents: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}
