//! Saving and loading finished runs
//!
//! A [`RunReport`] pairs the configuration a run was started with and the
//! history it produced. Together with the topology and the seed inside the
//! configuration, that is enough to reproduce or compare runs later.

use crate::error::PersistenceError;
use crate::simulation::{History, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration and statistics of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: SimulationConfig,
    pub history: History,
}

impl RunReport {
    #[must_use]
    pub fn new(config: SimulationConfig, history: History) -> Self {
        Self { config, history }
    }

    /// Load a report from a JSON file.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Io`] if the file cannot be read and
    /// [`PersistenceError::Json`] if it is not a valid report.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Json`] if serialization fails and
    /// [`PersistenceError::Io`] if the file cannot be written.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Census, TickRecord};
    use std::env;

    fn sample_report() -> RunReport {
        let mut history = History::new();
        history.push(TickRecord::new(
            0,
            Census {
                trees: 8,
                rocks: 2,
                burning: 1,
            },
        ));
        history.push(TickRecord::new(
            1,
            Census {
                trees: 7,
                rocks: 3,
                burning: 2,
            },
        ));
        let config = SimulationConfig {
            seed: 99,
            ..SimulationConfig::default()
        };
        RunReport::new(config, history)
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir().join(format!("graph-fire-report-{}.json", std::process::id()));
        let report = sample_report();
        report.save_json(&path).unwrap();

        let loaded = RunReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = env::temp_dir().join("graph-fire-report-does-not-exist.json");
        match RunReport::load_json(&path) {
            Err(PersistenceError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_json_error() {
        let path = env::temp_dir().join(format!("graph-fire-garbage-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            RunReport::load_json(&path),
            Err(PersistenceError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
