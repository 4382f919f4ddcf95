//! The in-memory workspace document.
//!
//! [`Document`] is a thin wrapper over a tree of [`Element`]s, the same shape
//! as the XML it was read from: each element has a tag name, ordered
//! attributes, child elements and optional text. The root carries the
//! `Version` attribute; node elements live in the `Elements` section (legacy
//! files: `dynElements`) and connectors in the `Connectors` section (legacy:
//! `dynConnectors`).
//!
//! Migration mutates the document in place. There is no separate output
//! format.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeGuid;
use crate::version::{normalize_version_string, Version};

/// Root attribute holding the declared schema version.
pub const VERSION_ATTRIBUTE: &str = "Version";
/// Node attribute holding the fully-qualified node type name.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Node attribute holding the node's identity.
pub const GUID_ATTRIBUTE: &str = "guid";

pub const ELEMENTS_SECTION: &str = "Elements";
pub const LEGACY_ELEMENTS_SECTION: &str = "dynElements";
pub const CONNECTORS_SECTION: &str = "Connectors";
pub const LEGACY_CONNECTORS_SECTION: &str = "dynConnectors";

/// A single element of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// Returns the attribute value, or `None` if the attribute is absent.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the attribute value, or the empty string if absent.
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or("")
    }

    /// Returns the attribute value, failing with
    /// [`CoreError::MissingAttribute`] if it is absent.
    pub fn require_attribute(&self, name: &str) -> Result<&str, CoreError> {
        self.attribute(name).ok_or_else(|| CoreError::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, preserving the order of the remaining ones.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Convenience accessor for the node identity attribute.
    pub fn guid(&self) -> Option<NodeGuid> {
        self.attribute(GUID_ATTRIBUTE).map(NodeGuid::from)
    }

    /// Convenience accessor for the node type attribute.
    pub fn node_type(&self) -> Option<&str> {
        self.attribute(TYPE_ATTRIBUTE)
    }

    // -----------------------------------------------------------------------
    // Children and text
    // -----------------------------------------------------------------------

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }
}

/// A workspace document: the root element and everything under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    // -----------------------------------------------------------------------
    // Version
    // -----------------------------------------------------------------------

    /// The raw `Version` attribute of the root, if present.
    pub fn declared_version_text(&self) -> Option<&str> {
        self.root.attribute(VERSION_ATTRIBUTE)
    }

    /// The declared version, normalized (missing or empty yields `0.0.0`).
    pub fn declared_version(&self) -> Result<Version, CoreError> {
        normalize_version_string(self.declared_version_text())
    }

    /// Overwrites the root `Version` attribute.
    pub fn set_version(&mut self, version: Version) {
        self.root
            .set_attribute(VERSION_ATTRIBUTE, format!("{}.0", version));
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    fn section_index(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.root
                .children
                .iter()
                .position(|c| c.name == *name)
        })
    }

    /// The node section (`Elements`, falling back to legacy `dynElements`).
    pub fn elements_section(&self) -> Option<&Element> {
        let idx = self.section_index(&[ELEMENTS_SECTION, LEGACY_ELEMENTS_SECTION])?;
        Some(&self.root.children[idx])
    }

    pub fn elements_section_mut(&mut self) -> Option<&mut Element> {
        let idx = self.section_index(&[ELEMENTS_SECTION, LEGACY_ELEMENTS_SECTION])?;
        Some(&mut self.root.children[idx])
    }

    /// The connector section (`Connectors`, falling back to legacy
    /// `dynConnectors`).
    pub fn connectors_section(&self) -> Option<&Element> {
        let idx = self.section_index(&[CONNECTORS_SECTION, LEGACY_CONNECTORS_SECTION])?;
        Some(&self.root.children[idx])
    }

    pub fn connectors_section_mut(&mut self) -> Option<&mut Element> {
        let idx = self.section_index(&[CONNECTORS_SECTION, LEGACY_CONNECTORS_SECTION])?;
        Some(&mut self.root.children[idx])
    }

    /// Returns the connector section, appending an empty `Connectors`
    /// section to the root first if the document has none.
    pub fn ensure_connectors_section(&mut self) -> &mut Element {
        let idx = match self.section_index(&[CONNECTORS_SECTION, LEGACY_CONNECTORS_SECTION]) {
            Some(idx) => idx,
            None => {
                self.root.children.push(Element::new(CONNECTORS_SECTION));
                self.root.children.len() - 1
            }
        };
        &mut self.root.children[idx]
    }

    /// All node elements, or an empty slice if the node section is missing.
    pub fn nodes(&self) -> &[Element] {
        self.elements_section().map(Element::children).unwrap_or(&[])
    }

    /// All connector elements, or an empty slice if the section is missing.
    pub fn connectors(&self) -> &[Element] {
        self.connectors_section()
            .map(Element::children)
            .unwrap_or(&[])
    }

    /// Looks up a node element by its `guid` attribute.
    pub fn find_node(&self, guid: &NodeGuid) -> Option<&Element> {
        self.nodes()
            .iter()
            .find(|n| n.attribute(GUID_ATTRIBUTE) == Some(guid.as_str()))
    }
}
