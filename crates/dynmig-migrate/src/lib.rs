//! Version-keyed migration of workspace documents and their node elements.
//!
//! A [`RuleRegistry`] collects workspace rules (whole-document rewrites) and
//! per-node-type rules. A [`MigrationManager`] walks each rule chain from a
//! file's declared version up to the configured current version.

pub mod builtin;
pub mod chain;
pub mod config;
pub mod data;
pub mod element;
pub mod error;
pub mod integrity;
pub mod manager;
pub mod registry;
pub mod report;
pub mod rule;

pub use builtin::builtin_registry;
pub use chain::{plan_chain, ChainOutcome, ChainPlan};
pub use config::{MigrationConfig, CURRENT_WORKSPACE_VERSION};
pub use data::{ConnectorHandle, NodeMigrationData};
pub use element::{
    create_canonical_element, duplicate_with_all_attributes, duplicate_with_attributes,
    migrate_to_canonical,
};
pub use error::MigrationError;
pub use integrity::{find_dangling_connectors, ConnectorGraph, ConnectorIssue};
pub use manager::{MigrationManager, NodeMigration};
pub use registry::{MigrationTarget, RuleRegistry};
pub use report::{MigrationReport, NodeReport};
pub use rule::{NodeRule, Rule, VersionBounds, WorkspaceRule};
