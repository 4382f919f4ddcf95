//! Migration error types for dynmig-migrate.
//!
//! [`MigrationError`] covers argument validation in the element helpers,
//! rule registration, malformed documents seen by the node-list driver, and
//! failures raised from inside rule transforms. An error returned from a
//! chain leaves every earlier rule's effects in place.

use dynmig_core::CoreError;
use thiserror::Error;

/// Errors produced while registering or applying migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A helper was called with a missing or empty required argument.
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// A rule's version bounds are unusable (unparseable or `to < from`).
    #[error("invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    /// The document lacks structure the node-list driver relies on.
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// A rule asked for a migrated node position that does not exist.
    #[error("no migrated node at index {index} (have {count})")]
    MissingMigratedNode { index: usize, count: usize },

    /// A connector handle or port lookup did not resolve.
    #[error("connector not found: {reason}")]
    ConnectorNotFound { reason: String },

    /// A rule transform reported a failure of its own.
    #[error("rule '{rule}' failed: {reason}")]
    RuleFailed { rule: String, reason: String },

    /// Document model or XML failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}
