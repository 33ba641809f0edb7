use serde::{Deserialize, Serialize};

use objson_types::IgnoredSet;

/// Persistence settings shared by a facade and the documents built on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Properties left out of saved files (default: `objectName`).
    pub ignored: IgnoredSet,
    /// Create missing parent directories before writing.
    pub create_parent_dirs: bool,
    /// `fsync` the file after each save.
    pub sync_on_save: bool,
    /// Treat a missing file as an empty, successfully loaded one.
    pub missing_is_empty: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            ignored: IgnoredSet::default(),
            create_parent_dirs: true,
            sync_on_save: false,
            missing_is_empty: false,
        }
    }
}
