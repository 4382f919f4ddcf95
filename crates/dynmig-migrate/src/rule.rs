//! Migration rule records.
//!
//! A rule is a pair of version bounds plus a transform. Workspace rules see
//! the whole [`Document`]; node rules receive a [`NodeMigrationData`] holding
//! the node(s) being migrated and return the replacement node(s).
//!
//! Bounds are written the way rule authors think of them:
//! `("0.6.3", "0.7.0.0")`, where an empty `to` marks a terminal rule after
//! which no further version is tracked.

use std::fmt;
use std::sync::Arc;

use dynmig_core::{Document, Version};

use crate::data::NodeMigrationData;
use crate::error::MigrationError;

/// Transform applied by a [`WorkspaceRule`].
pub type WorkspaceTransform = dyn Fn(&mut Document) -> Result<(), MigrationError> + Send + Sync;

/// Transform applied by a [`NodeRule`].
pub type NodeTransform = dyn for<'a> Fn(
        NodeMigrationData<'a>,
    ) -> Result<NodeMigrationData<'a>, MigrationError>
    + Send
    + Sync;

/// The version range a rule migrates across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionBounds {
    /// Lowest document version this rule is written for.
    pub from: Version,
    /// Version the document is at after the rule. `None` is terminal.
    pub to: Option<Version>,
}

impl VersionBounds {
    /// Builds bounds, rejecting a `to` below `from`.
    pub fn new(from: Version, to: Option<Version>) -> Result<Self, String> {
        match to {
            Some(to) if to < from => Err(format!("target {} precedes source {}", to, from)),
            _ => Ok(VersionBounds { from, to }),
        }
    }

    /// Parses marker-style bounds. An empty `to` means terminal.
    pub fn parse(from: &str, to: &str) -> Result<Self, String> {
        let from = Version::parse(from).map_err(|e| e.to_string())?;
        let to = if to.trim().is_empty() {
            None
        } else {
            Some(Version::parse(to).map_err(|e| e.to_string())?)
        };
        Self::new(from, to)
    }
}

impl fmt::Display for VersionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "{} -> {}", self.from, to),
            None => write!(f, "{} -> (terminal)", self.from),
        }
    }
}

/// Common view of workspace and node rules used by the chain walker.
pub trait Rule {
    fn name(&self) -> &str;
    fn bounds(&self) -> &VersionBounds;
}

/// A rule applied to the whole document.
#[derive(Clone)]
pub struct WorkspaceRule {
    name: String,
    bounds: VersionBounds,
    transform: Arc<WorkspaceTransform>,
}

impl WorkspaceRule {
    /// Creates a rule from marker-style version strings.
    pub fn new<F>(
        name: impl Into<String>,
        from: &str,
        to: &str,
        transform: F,
    ) -> Result<Self, MigrationError>
    where
        F: Fn(&mut Document) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        let name = name.into();
        let bounds = VersionBounds::parse(from, to)
            .map_err(|reason| MigrationError::InvalidRule {
                rule: name.clone(),
                reason,
            })?;
        Ok(WorkspaceRule {
            name,
            bounds,
            transform: Arc::new(transform),
        })
    }

    pub fn apply(&self, document: &mut Document) -> Result<(), MigrationError> {
        (self.transform)(document)
    }
}

impl Rule for WorkspaceRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> &VersionBounds {
        &self.bounds
    }
}

impl fmt::Debug for WorkspaceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceRule")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// A rule applied to a single node element.
#[derive(Clone)]
pub struct NodeRule {
    name: String,
    bounds: VersionBounds,
    transform: Arc<NodeTransform>,
}

impl NodeRule {
    /// Creates a rule from marker-style version strings.
    pub fn new<F>(
        name: impl Into<String>,
        from: &str,
        to: &str,
        transform: F,
    ) -> Result<Self, MigrationError>
    where
        F: for<'a> Fn(NodeMigrationData<'a>) -> Result<NodeMigrationData<'a>, MigrationError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let bounds = VersionBounds::parse(from, to)
            .map_err(|reason| MigrationError::InvalidRule {
                rule: name.clone(),
                reason,
            })?;
        Ok(NodeRule {
            name,
            bounds,
            transform: Arc::new(transform),
        })
    }

    pub fn apply<'a>(
        &self,
        data: NodeMigrationData<'a>,
    ) -> Result<NodeMigrationData<'a>, MigrationError> {
        (self.transform)(data)
    }
}

impl Rule for NodeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> &VersionBounds {
        &self.bounds
    }
}

impl fmt::Debug for NodeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRule")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
