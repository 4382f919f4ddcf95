//! Explicit rule registry.
//!
//! Rules are registered up front instead of being discovered from marked
//! methods at load time. Workspace rules come in named [`MigrationTarget`]
//! bundles; node rules are registered against the fully-qualified node type
//! name they migrate. Every list is kept sorted by `from` with a stable
//! sort, so rules sharing a `from` stay in declaration order.

use std::collections::HashMap;

use crate::rule::{NodeRule, Rule, WorkspaceRule};

/// A named bundle of workspace rules.
#[derive(Debug, Clone)]
pub struct MigrationTarget {
    pub name: String,
    pub workspace_rules: Vec<WorkspaceRule>,
}

impl MigrationTarget {
    pub fn new(name: impl Into<String>, workspace_rules: Vec<WorkspaceRule>) -> Self {
        MigrationTarget {
            name: name.into(),
            workspace_rules,
        }
    }
}

/// Registry of workspace and node migration rules.
///
/// Built once, then shared read-only (typically behind an `Arc`) by every
/// [`MigrationManager`](crate::manager::MigrationManager) that loads files.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    /// Registered target names, in registration order.
    targets: Vec<String>,
    /// Workspace rules across all targets, sorted by `from`.
    workspace_rules: Vec<WorkspaceRule>,
    /// Node type name -> that type's rules, sorted by `from`.
    node_rules: HashMap<String, Vec<NodeRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records migration targets. A target whose name is already registered
    /// is skipped, so the target set is idempotent.
    pub fn register_migration_targets(
        &mut self,
        targets: impl IntoIterator<Item = MigrationTarget>,
    ) {
        for target in targets {
            if self.targets.iter().any(|t| *t == target.name) {
                tracing::debug!("migration target '{}' already registered", target.name);
                continue;
            }
            tracing::debug!(
                "registering migration target '{}' with {} workspace rule(s)",
                target.name,
                target.workspace_rules.len()
            );
            self.targets.push(target.name);
            self.workspace_rules.extend(target.workspace_rules);
        }
        sort_by_from(&mut self.workspace_rules);
    }

    /// Registers rules owned by a node type. Calling this twice for the same
    /// type appends the rules again.
    pub fn register_node_type(
        &mut self,
        type_name: impl Into<String>,
        rules: impl IntoIterator<Item = NodeRule>,
    ) {
        let list = self.node_rules.entry(type_name.into()).or_default();
        list.extend(rules);
        sort_by_from(list);
    }

    /// Names of the registered targets, in registration order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Every workspace rule, sorted by `from`.
    pub fn workspace_rules(&self) -> &[WorkspaceRule] {
        &self.workspace_rules
    }

    /// Rules declared for `type_name`, sorted by `from`. Empty if the type
    /// has none.
    pub fn node_rules(&self, type_name: &str) -> &[NodeRule] {
        self.node_rules
            .get(type_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `type_name` has at least one node rule.
    pub fn has_node_rules(&self, type_name: &str) -> bool {
        !self.node_rules(type_name).is_empty()
    }

    /// Node type names with registered rules, sorted for determinism.
    pub fn node_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.node_rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn sort_by_from<R: Rule>(rules: &mut [R]) {
    // `sort_by_key` is stable: equal `from` keeps declaration order.
    rules.sort_by_key(|r| r.bounds().from);
}
