//! Core error types for dynmig-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! version parsing, XML reading/writing and attribute lookups on the
//! document model.

use thiserror::Error;

/// Core errors produced by the dynmig-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A dotted version string could not be parsed.
    #[error("invalid version '{text}': {reason}")]
    InvalidVersion { text: String, reason: String },

    /// The XML reader or writer failed.
    #[error("xml error: {reason}")]
    Xml { reason: String },

    /// An element lacks an attribute the caller requires.
    #[error("element <{element}> has no '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },
}

impl CoreError {
    /// Wraps any displayable reader/writer failure as [`CoreError::Xml`].
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        CoreError::Xml {
            reason: err.to_string(),
        }
    }
}
