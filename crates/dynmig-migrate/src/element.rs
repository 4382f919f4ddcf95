//! Helpers for building canonical function-call elements.
//!
//! Most legacy node types migrate into the single canonical function-call
//! node. These helpers copy the relevant attributes from a legacy element
//! (or build a fresh one) and stamp the canonical `type`.

use dynmig_core::document::{GUID_ATTRIBUTE, TYPE_ATTRIBUTE};
use dynmig_core::{Element, NodeGuid};

use crate::data::NodeMigrationData;
use crate::error::MigrationError;

/// Tag and `type` value of the canonical function-call node.
pub const CANONICAL_TYPE: &str = "Dynamo.Nodes.DSFunction";

/// Library the function lives in (`ProtoGeometry.dll`; empty for builtins).
pub const ASSEMBLY_ATTRIBUTE: &str = "assembly";
/// Name shown on the node.
pub const NICKNAME_ATTRIBUTE: &str = "nickname";
/// Fully-qualified signature, e.g. `Arc.ByPointsOnCurve@Point,Point,Point`.
pub const FUNCTION_ATTRIBUTE: &str = "function";

/// Copies the named attributes of `source` into a new canonical element.
///
/// A name missing on `source` becomes an empty attribute. The canonical
/// `type` is stamped last and overrides a copied `type`.
pub fn duplicate_with_attributes(
    source: &Element,
    attribute_names: &[&str],
) -> Result<Element, MigrationError> {
    if attribute_names.is_empty() {
        return Err(MigrationError::InvalidArgument {
            argument: "attribute_names",
            reason: "at least one attribute name is required".to_string(),
        });
    }

    let mut element = Element::new(CANONICAL_TYPE);
    for name in attribute_names {
        element.set_attribute(*name, source.attribute_or_empty(name));
    }
    element.set_attribute(TYPE_ATTRIBUTE, CANONICAL_TYPE);
    Ok(element)
}

/// Copies every attribute of `source` into a new canonical element.
pub fn duplicate_with_all_attributes(source: &Element) -> Element {
    let mut element = Element::new(CANONICAL_TYPE);
    for (name, value) in source.attributes() {
        element.set_attribute(name.as_str(), value.as_str());
    }
    element.set_attribute(TYPE_ATTRIBUTE, CANONICAL_TYPE);
    element
}

/// Builds a brand-new canonical element with a fresh guid.
pub fn create_canonical_element(
    module_name: &str,
    display_name: &str,
    qualified_signature: &str,
) -> Element {
    Element::new(CANONICAL_TYPE)
        .with_attribute(TYPE_ATTRIBUTE, CANONICAL_TYPE)
        .with_attribute(ASSEMBLY_ATTRIBUTE, module_name)
        .with_attribute(NICKNAME_ATTRIBUTE, display_name)
        .with_attribute(FUNCTION_ATTRIBUTE, qualified_signature)
        .with_attribute(GUID_ATTRIBUTE, NodeGuid::new_random().to_string())
}

/// Reads the `guid` of a node element.
pub fn guid_of(element: &Element) -> Result<NodeGuid, MigrationError> {
    Ok(NodeGuid::from(element.require_attribute(GUID_ATTRIBUTE)?))
}

/// Replaces the first migrated node with its canonical duplicate pointing at
/// `module_name` / `qualified_signature`. Ports map one to one, so existing
/// connectors stay valid.
pub fn migrate_to_canonical<'a>(
    mut data: NodeMigrationData<'a>,
    module_name: &str,
    display_name: &str,
    qualified_signature: &str,
) -> Result<NodeMigrationData<'a>, MigrationError> {
    let legacy = data.take_nodes();
    let source = legacy
        .first()
        .ok_or_else(|| MigrationError::InvalidArgument {
            argument: "data",
            reason: "no node to migrate".to_string(),
        })?;

    let mut element = duplicate_with_all_attributes(source);
    element.set_attribute(ASSEMBLY_ATTRIBUTE, module_name);
    element.set_attribute(NICKNAME_ATTRIBUTE, display_name);
    element.set_attribute(FUNCTION_ATTRIBUTE, qualified_signature);

    data.append_node(element);
    Ok(data)
}
