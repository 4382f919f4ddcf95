//! Workspace-level migrations shipped with the application.

use dynmig_core::connector::CONNECTOR_TAG;
use dynmig_core::document::{
    CONNECTORS_SECTION, ELEMENTS_SECTION, LEGACY_CONNECTORS_SECTION, LEGACY_ELEMENTS_SECTION,
    TYPE_ATTRIBUTE,
};
use dynmig_core::{Document, Element};

use crate::error::MigrationError;
use crate::registry::MigrationTarget;
use crate::rule::WorkspaceRule;

/// Name of the built-in workspace migration target.
pub const WORKSPACE_TARGET: &str = "WorkspaceMigrations";

const LEGACY_ROOT: &str = "dynWorkspace";
const ROOT: &str = "Workspace";
const LEGACY_NOTES_SECTION: &str = "dynNotes";
const NOTES_SECTION: &str = "Notes";

/// The built-in workspace target.
pub fn workspace_target() -> Result<MigrationTarget, MigrationError> {
    Ok(MigrationTarget::new(
        WORKSPACE_TARGET,
        vec![WorkspaceRule::new(
            "drop legacy dyn prefix",
            "0.5.3",
            "0.6.0",
            drop_legacy_prefix,
        )?],
    ))
}

/// 0.5.3 -> 0.6.0: class names lost their `dyn` prefix
/// (`Dynamo.Nodes.dynAddition` became `Dynamo.Nodes.Addition`), and so did
/// the root and section element names.
pub fn drop_legacy_prefix(document: &mut Document) -> Result<(), MigrationError> {
    let root = document.root_mut();
    if root.name() == LEGACY_ROOT {
        root.set_name(ROOT);
    }

    for section in root.children_mut() {
        let renamed = match section.name() {
            LEGACY_ELEMENTS_SECTION => Some(ELEMENTS_SECTION),
            LEGACY_CONNECTORS_SECTION => Some(CONNECTORS_SECTION),
            LEGACY_NOTES_SECTION => Some(NOTES_SECTION),
            _ => None,
        };
        if let Some(name) = renamed {
            section.set_name(name);
        }
    }

    if let Some(section) = document.elements_section_mut() {
        for node in section.children_mut() {
            rename_node(node);
        }
    }

    if let Some(section) = document.connectors_section_mut() {
        for connector in section.children_mut() {
            connector.set_name(CONNECTOR_TAG);
        }
    }

    Ok(())
}

fn rename_node(node: &mut Element) {
    if let Some(ty) = node.node_type().and_then(strip_dyn_prefix) {
        node.set_attribute(TYPE_ATTRIBUTE, ty);
    }
    if let Some(tag) = strip_dyn_prefix(node.name()) {
        node.set_name(tag);
    }
}

/// `Dynamo.Nodes.dynAddition` -> `Dynamo.Nodes.Addition`. Returns `None`
/// when the last path segment has no `dyn` prefix followed by an uppercase
/// letter.
fn strip_dyn_prefix(qualified: &str) -> Option<String> {
    let (namespace, class) = match qualified.rsplit_once('.') {
        Some((ns, class)) => (Some(ns), class),
        None => (None, qualified),
    };
    let rest = class.strip_prefix("dyn")?;
    if !rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some(match namespace {
        Some(ns) => format!("{}.{}", ns, rest),
        None => rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynmig_core::parse_document;

    #[test]
    fn strips_prefix_only_before_uppercase() {
        assert_eq!(
            strip_dyn_prefix("Dynamo.Nodes.dynAddition").as_deref(),
            Some("Dynamo.Nodes.Addition")
        );
        assert_eq!(strip_dyn_prefix("dynSum").as_deref(), Some("Sum"));
        assert_eq!(strip_dyn_prefix("Dynamo.Nodes.dynamite"), None);
        assert_eq!(strip_dyn_prefix("Dynamo.Nodes.Addition"), None);
    }

    #[test]
    fn renames_sections_nodes_and_connectors() {
        let mut doc = parse_document(
            r#"<dynWorkspace Version="0.5.2.0">
  <dynElements>
    <Dynamo.Nodes.dynAddition type="Dynamo.Nodes.dynAddition" guid="a" />
    <Dynamo.Nodes.dynamite type="Dynamo.Nodes.dynamite" guid="b" />
  </dynElements>
  <dynConnectors>
    <Dynamo.Connectors.dynConnector start="a" start_index="0" end="b" end_index="0" portType="0" />
  </dynConnectors>
  <dynNotes />
</dynWorkspace>"#,
        )
        .unwrap();

        drop_legacy_prefix(&mut doc).unwrap();

        assert_eq!(doc.root().name(), "Workspace");
        let names: Vec<&str> = doc.root().children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Elements", "Connectors", "Notes"]);
        assert_eq!(doc.nodes()[0].name(), "Dynamo.Nodes.Addition");
        assert_eq!(doc.nodes()[0].node_type(), Some("Dynamo.Nodes.Addition"));
        assert_eq!(doc.nodes()[1].node_type(), Some("Dynamo.Nodes.dynamite"));
        assert_eq!(doc.connectors()[0].name(), CONNECTOR_TAG);
    }

    #[test]
    fn current_document_is_unchanged() {
        let text = r#"<Workspace Version="0.6.0.0"><Elements><Dynamo.Nodes.Addition type="Dynamo.Nodes.Addition" guid="a" /></Elements></Workspace>"#;
        let mut doc = parse_document(text).unwrap();
        let before = doc.clone();
        drop_legacy_prefix(&mut doc).unwrap();
        assert_eq!(doc, before);
    }
}
