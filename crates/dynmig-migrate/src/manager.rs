//! The migration manager.
//!
//! [`MigrationManager`] brings a loaded document from its declared version
//! up to the configured current version. It is an explicit value scoped to
//! the load operation, holding a shared [`RuleRegistry`] and a
//! [`MigrationConfig`].
//!
//! # Failure behavior
//!
//! Migration is not transactional. When a rule transform fails, the error is
//! returned immediately and every rule applied before it in the same call
//! stays applied; the document is then at an indeterminate version. Reaching
//! a version for which no rule qualifies is not an error.

use std::sync::Arc;

use dynmig_core::{Document, Element, Version};

use crate::chain::{plan_chain, ChainOutcome};
use crate::config::MigrationConfig;
use crate::data::NodeMigrationData;
use crate::error::MigrationError;
use crate::registry::RuleRegistry;
use crate::report::{MigrationReport, NodeReport};
use crate::rule::Rule;

/// Result of migrating a single node element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMigration {
    /// `true` iff at least one rule fired.
    pub attempted: bool,
    /// Replacement nodes. The untouched input node when nothing fired.
    pub nodes: Vec<Element>,
    pub outcome: ChainOutcome,
}

/// A node chain as far as it got.
struct NodeChainRun {
    nodes: Vec<Element>,
    outcome: ChainOutcome,
    failure: Option<MigrationError>,
}

/// Applies registered migration rules to documents and node elements.
#[derive(Debug, Clone)]
pub struct MigrationManager {
    registry: Arc<RuleRegistry>,
    config: MigrationConfig,
}

impl MigrationManager {
    pub fn new(registry: Arc<RuleRegistry>, config: MigrationConfig) -> Self {
        MigrationManager { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    pub fn current_version(&self) -> Version {
        self.config.current_version
    }

    // -----------------------------------------------------------------------
    // Workspace rules
    // -----------------------------------------------------------------------

    /// Applies the workspace rule chain starting at `declared`.
    ///
    /// `None` is a no-op.
    pub fn migrate_workspace(
        &self,
        document: &mut Document,
        declared: Option<Version>,
    ) -> Result<ChainOutcome, MigrationError> {
        let plan = plan_chain(
            self.registry.workspace_rules(),
            declared,
            self.config.current_version,
        );

        let mut fired = Vec::with_capacity(plan.steps.len());
        for rule in plan.steps {
            tracing::debug!(
                "applying workspace migration '{}' ({})",
                rule.name(),
                rule.bounds()
            );
            rule.apply(document)?;
            fired.push(rule.name().to_string());
        }

        Ok(ChainOutcome {
            fired,
            reached: plan.reached,
        })
    }

    // -----------------------------------------------------------------------
    // Node rules
    // -----------------------------------------------------------------------

    /// Applies `node_type`'s own rule chain to `node`, starting at
    /// `declared`.
    ///
    /// Each rule receives the nodes produced by the previous one. Connector
    /// edits made by rules go straight into `document`. On failure the
    /// error is returned and the produced nodes are discarded; use
    /// [`migrate_node_list`](Self::migrate_node_list) to keep them in the
    /// document.
    pub fn migrate_node(
        &self,
        document: &mut Document,
        node: Element,
        node_type: &str,
        declared: Option<Version>,
    ) -> Result<NodeMigration, MigrationError> {
        let run = self.run_node_chain(document, node, node_type, declared);
        match run.failure {
            Some(err) => Err(err),
            None => Ok(NodeMigration {
                attempted: run.outcome.attempted(),
                nodes: run.nodes,
                outcome: run.outcome,
            }),
        }
    }

    /// Walks a node chain, keeping the nodes produced by the last rule that
    /// succeeded when a later one fails.
    fn run_node_chain(
        &self,
        document: &mut Document,
        node: Element,
        node_type: &str,
        declared: Option<Version>,
    ) -> NodeChainRun {
        let plan = plan_chain(
            self.registry.node_rules(node_type),
            declared,
            self.config.current_version,
        );

        let mut data = NodeMigrationData::with_node(document, node);
        let mut fired = Vec::with_capacity(plan.steps.len());
        let mut reached = declared;
        for rule in plan.steps {
            tracing::debug!(
                "applying node migration '{}' to {} ({})",
                rule.name(),
                node_type,
                rule.bounds()
            );
            // The transform consumes the container, so keep what the
            // previous step produced in case this one fails.
            let committed = data.migrated_nodes().to_vec();
            match rule.apply(data) {
                Ok(next) => {
                    data = next;
                    fired.push(rule.name().to_string());
                    reached = rule.bounds().to;
                }
                Err(err) => {
                    tracing::warn!(
                        "node migration '{}' failed on {}: {}",
                        rule.name(),
                        node_type,
                        err
                    );
                    return NodeChainRun {
                        nodes: committed,
                        outcome: ChainOutcome { fired, reached },
                        failure: Some(err),
                    };
                }
            }
        }

        NodeChainRun {
            nodes: data.into_nodes(),
            outcome: ChainOutcome {
                fired,
                reached: plan.reached,
            },
            failure: None,
        }
    }

    // -----------------------------------------------------------------------
    // Whole-document pipeline
    // -----------------------------------------------------------------------

    /// Migrates a freshly loaded document: workspace rules first, then every
    /// node in the node section, both from the file's declared version.
    pub fn migrate_document(
        &self,
        document: &mut Document,
    ) -> Result<MigrationReport, MigrationError> {
        let declared = document.declared_version()?;
        let workspace = self.migrate_workspace(document, Some(declared))?;
        let nodes = self.migrate_node_list(document, declared)?;

        let stamped = self.config.stamp_version && declared < self.config.current_version;
        if stamped {
            document.set_version(self.config.current_version);
        }

        tracing::info!(
            "migrated document from {} towards {}: {} workspace rule(s), {} node(s)",
            declared,
            self.config.current_version,
            workspace.fired.len(),
            nodes.len()
        );

        Ok(MigrationReport {
            declared,
            current: self.config.current_version,
            workspace,
            nodes,
            stamped,
        })
    }

    /// Walks the node section in document order and replaces every node
    /// whose type has rules with the nodes its chain produces.
    ///
    /// Fails with [`MigrationError::MalformedDocument`] if the node section
    /// is missing or a node has no `type`. Nodes before the offending one
    /// have already been migrated at that point. When a node rule fails,
    /// the nodes produced by the rules before it replace the legacy node
    /// before the error is returned.
    pub fn migrate_node_list(
        &self,
        document: &mut Document,
        declared: Version,
    ) -> Result<Vec<NodeReport>, MigrationError> {
        let mut reports = Vec::new();
        let mut position = 0;

        loop {
            let section = elements_section(document)?;
            let Some(node) = section.children().get(position) else {
                break;
            };

            let node_type = node
                .node_type()
                .ok_or_else(|| MigrationError::MalformedDocument {
                    reason: format!(
                        "node <{}> at position {} has no 'type' attribute",
                        node.name(),
                        position
                    ),
                })?
                .to_string();

            if !self.registry.has_node_rules(&node_type) {
                position += 1;
                continue;
            }

            let node = node.clone();
            let guid = node.guid().map(|g| g.0);
            let run = self.run_node_chain(document, node, &node_type, Some(declared));
            if !run.outcome.attempted() {
                if let Some(err) = run.failure {
                    return Err(err);
                }
                position += 1;
                continue;
            }

            // Rules that succeeded stay applied even if a later one failed.
            let produced = run.nodes.len();
            elements_section_mut(document)?
                .children_mut()
                .splice(position..position + 1, run.nodes);
            if let Some(err) = run.failure {
                return Err(err);
            }
            position += produced;

            reports.push(NodeReport {
                guid,
                node_type,
                fired: run.outcome.fired,
                produced,
            });
        }

        Ok(reports)
    }
}

fn elements_section(document: &Document) -> Result<&Element, MigrationError> {
    document
        .elements_section()
        .ok_or_else(missing_elements_section)
}

fn elements_section_mut(document: &mut Document) -> Result<&mut Element, MigrationError> {
    document
        .elements_section_mut()
        .ok_or_else(missing_elements_section)
}

fn missing_elements_section() -> MigrationError {
    MigrationError::MalformedDocument {
        reason: "document has no Elements or dynElements section".to_string(),
    }
}
