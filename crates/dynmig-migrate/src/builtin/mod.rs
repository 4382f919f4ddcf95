//! Migrations shipped with the application.
//!
//! [`builtin_registry`] is what a host registers at start-up; tests and
//! embedders can still build their own [`RuleRegistry`] from scratch.

pub mod geometry;
pub mod workspace;

use crate::error::MigrationError;
use crate::registry::RuleRegistry;

/// Registry holding every built-in workspace target and node rule.
pub fn builtin_registry() -> Result<RuleRegistry, MigrationError> {
    let mut registry = RuleRegistry::new();
    registry.register_migration_targets([workspace::workspace_target()?]);
    registry.register_node_type(
        geometry::ARC_START_MIDDLE_END,
        geometry::arc_start_middle_end_rules()?,
    );
    registry.register_node_type(geometry::ARC_CENTER, geometry::arc_center_rules()?);
    Ok(registry)
}
