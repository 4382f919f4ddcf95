//! Migration configuration.
//!
//! The current application schema version used to be read from a global
//! controller. It is now part of an explicit [`MigrationConfig`] handed to
//! each [`MigrationManager`](crate::manager::MigrationManager).

use dynmig_core::Version;
use serde::{Deserialize, Serialize};

/// Schema version written by the current application.
pub const CURRENT_WORKSPACE_VERSION: Version = Version::new(0, 7, 0);

/// Configuration for a migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// The version documents are migrated towards. Chains stop once the
    /// tracked version reaches it.
    pub current_version: Version,
    /// Whether [`migrate_document`](crate::manager::MigrationManager::migrate_document)
    /// rewrites the root `Version` attribute to `current_version` afterwards.
    pub stamp_version: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        MigrationConfig {
            current_version: CURRENT_WORKSPACE_VERSION,
            stamp_version: false,
        }
    }
}

impl MigrationConfig {
    pub fn with_current_version(mut self, version: Version) -> Self {
        self.current_version = version;
        self
    }

    pub fn with_stamp_version(mut self, stamp: bool) -> Self {
        self.stamp_version = stamp;
        self
    }
}
