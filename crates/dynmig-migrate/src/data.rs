//! The node-migration result container.
//!
//! A [`NodeMigrationData`] is what node rules consume and return. It holds
//! the ordered list of node elements produced so far (initially the single
//! legacy node) and a mutable borrow of the document, through which rules
//! rewire connectors. A rule that splits one legacy node into a canonical
//! node plus helper nodes takes the old nodes out, appends the new ones and
//! redirects or creates connectors so that no edge is left dangling.

use dynmig_core::connector::{element_touches_port, redirect_element, Connector};
use dynmig_core::{Document, Element, NodeGuid, PortId};

use crate::error::MigrationError;

/// Position of a connector element within the document's connector section.
///
/// Handles stay valid for the lifetime of a [`NodeMigrationData`]: rules
/// only ever append connectors, never remove them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorHandle(pub usize);

/// Nodes produced by a node rule plus access to the owning document.
#[derive(Debug)]
pub struct NodeMigrationData<'a> {
    document: &'a mut Document,
    migrated_nodes: Vec<Element>,
}

impl<'a> NodeMigrationData<'a> {
    /// Creates an empty container over `document`.
    pub fn new(document: &'a mut Document) -> Self {
        NodeMigrationData {
            document,
            migrated_nodes: Vec::new(),
        }
    }

    /// Creates a container seeded with the node about to be migrated.
    pub fn with_node(document: &'a mut Document, node: Element) -> Self {
        NodeMigrationData {
            document,
            migrated_nodes: vec![node],
        }
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    // -----------------------------------------------------------------------
    // Migrated nodes
    // -----------------------------------------------------------------------

    pub fn append_node(&mut self, node: Element) {
        self.migrated_nodes.push(node);
    }

    pub fn migrated_nodes(&self) -> &[Element] {
        &self.migrated_nodes
    }

    /// The node at `index`, or [`MigrationError::MissingMigratedNode`].
    pub fn migrated_node(&self, index: usize) -> Result<&Element, MigrationError> {
        self.migrated_nodes
            .get(index)
            .ok_or(MigrationError::MissingMigratedNode {
                index,
                count: self.migrated_nodes.len(),
            })
    }

    pub fn migrated_node_mut(&mut self, index: usize) -> Result<&mut Element, MigrationError> {
        let count = self.migrated_nodes.len();
        self.migrated_nodes
            .get_mut(index)
            .ok_or(MigrationError::MissingMigratedNode { index, count })
    }

    /// Removes and returns every node produced so far, leaving the container
    /// empty for the rule's replacement nodes.
    pub fn take_nodes(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.migrated_nodes)
    }

    /// Consumes the container, releasing the document borrow.
    pub fn into_nodes(self) -> Vec<Element> {
        self.migrated_nodes
    }

    // -----------------------------------------------------------------------
    // Connectors
    // -----------------------------------------------------------------------

    /// The connector element behind `handle`, if it exists.
    pub fn connector(&self, handle: ConnectorHandle) -> Option<&Element> {
        self.document.connectors().get(handle.0)
    }

    /// Parses the connector behind `handle`.
    pub fn connector_view(&self, handle: ConnectorHandle) -> Result<Connector, MigrationError> {
        let element = self
            .connector(handle)
            .ok_or_else(|| MigrationError::ConnectorNotFound {
                reason: format!("no connector at position {}", handle.0),
            })?;
        Ok(Connector::from_element(element)?)
    }

    /// First connector attached to `port`, in document order.
    pub fn find_first_connector(&self, port: &PortId) -> Option<ConnectorHandle> {
        self.document
            .connectors()
            .iter()
            .position(|c| element_touches_port(c, port))
            .map(ConnectorHandle)
    }

    /// Every connector attached to `port`, in document order.
    pub fn find_connectors(&self, port: &PortId) -> Vec<ConnectorHandle> {
        self.document
            .connectors()
            .iter()
            .enumerate()
            .filter(|(_, c)| element_touches_port(c, port))
            .map(|(i, _)| ConnectorHandle(i))
            .collect()
    }

    /// Points the end of the connector matching `port`'s direction at `port`:
    /// output ports rewrite `start`, input ports rewrite `end`.
    pub fn reconnect_to_port(
        &mut self,
        handle: ConnectorHandle,
        port: &PortId,
    ) -> Result<(), MigrationError> {
        let element = self
            .document
            .connectors_section_mut()
            .and_then(|section| section.children_mut().get_mut(handle.0))
            .ok_or_else(|| MigrationError::ConnectorNotFound {
                reason: format!("no connector at position {}", handle.0),
            })?;
        redirect_element(element, port);
        Ok(())
    }

    /// Creates a connector from output `start_index` of `start_node` to
    /// input `end_index` of `end_node`, reading both guids from the elements.
    pub fn create_connector(
        &mut self,
        start_node: &Element,
        start_index: usize,
        end_node: &Element,
        end_index: usize,
    ) -> Result<ConnectorHandle, MigrationError> {
        let start = crate::element::guid_of(start_node)?;
        let end = crate::element::guid_of(end_node)?;
        Ok(self.create_connector_from_id(start, start_index, end, end_index))
    }

    /// Creates a connector between two (guid, port) pairs, creating the
    /// connector section if the document has none.
    pub fn create_connector_from_id(
        &mut self,
        start: impl Into<NodeGuid>,
        start_index: usize,
        end: impl Into<NodeGuid>,
        end_index: usize,
    ) -> ConnectorHandle {
        let connector = Connector::new(start.into(), start_index, end.into(), end_index);
        let section = self.document.ensure_connectors_section();
        section.push_child(connector.to_element());
        ConnectorHandle(section.children().len() - 1)
    }
}
