use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use common::{Config, ConfigLoader};
use experience::DEFAULT_MAX_SNAPSHOTS;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct MergeOptions {
    pub max_snapshots: usize,
    pub interval: Duration,
    pub canonical_path: PathBuf,
    pub snapshot_dir: PathBuf,
}

impl Config for MergeOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            max_snapshots: config
                .get("max_snapshots")
                .and_then(|v| v.as_usize())
                .unwrap_or(DEFAULT_MAX_SNAPSHOTS),
            interval: Duration::from_secs(
                config
                    .get("interval_secs")
                    .and_then(|v| v.as_usize())
                    .unwrap_or(60) as u64,
            ),
            canonical_path: config.get_relative_path_or("canonical_path", "q/q.json")?,
            snapshot_dir: config.get_relative_path_or("snapshot_dir", "q")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_options() {
        let config = ConfigLoader::from_str(
            r#"
            max_snapshots = 3
            merge {
                max_snapshots = 25
                interval_secs = 5
                snapshot_dir = "values"
            }
        "#,
            "merge".to_string(),
        )
        .unwrap();
        let cwd = std::env::current_dir().unwrap();

        let options: MergeOptions = config.load().unwrap();

        assert_eq!(options.max_snapshots, 25);
        assert_eq!(options.interval, Duration::from_secs(5));
        assert_eq!(options.canonical_path, cwd.join("q/q.json"));
        assert_eq!(options.snapshot_dir, cwd.join("values"));
    }
}
