//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the file-backed store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Directory holding `schema.json` plus one JSON document per table.
    pub data_dir: PathBuf,

    /// Pretty-print persisted documents. Costs space, eases inspection.
    pub pretty_json: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./microdb_data"),
            pretty_json: true,
        }
    }
}

impl DbConfig {
    /// Default configuration rooted at `dir`.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }
}
