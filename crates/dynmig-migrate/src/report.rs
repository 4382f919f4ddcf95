//! Summaries of what a migration run did.

use dynmig_core::Version;
use serde::{Deserialize, Serialize};

use crate::chain::ChainOutcome;

/// One node rewritten by the node-list driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    /// `guid` of the legacy node, if it had one.
    pub guid: Option<String>,
    /// The legacy node's `type`.
    pub node_type: String,
    /// Names of the node rules applied, in order.
    pub fired: Vec<String>,
    /// How many node elements replaced the legacy one.
    pub produced: usize,
}

/// Result of [`MigrationManager::migrate_document`](crate::manager::MigrationManager::migrate_document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Normalized version the file declared.
    pub declared: Version,
    /// Version the run migrated towards.
    pub current: Version,
    /// Workspace-level chain.
    pub workspace: ChainOutcome,
    /// Every node that had at least one rule applied, in document order.
    pub nodes: Vec<NodeReport>,
    /// Whether the root `Version` attribute was rewritten.
    pub stamped: bool,
}

impl MigrationReport {
    /// Returns `true` if any workspace or node rule fired.
    pub fn changed(&self) -> bool {
        self.workspace.attempted() || !self.nodes.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
