//! Node and port identifiers used to address connector endpoints.
//!
//! Nodes in a workspace file are identified by the string in their `guid`
//! attribute; connectors refer to nodes by that string plus a port index.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a node element, as stored in its `guid` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeGuid(pub String);

impl NodeGuid {
    /// Generates a fresh random guid for a node created during migration.
    pub fn new_random() -> Self {
        NodeGuid(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeGuid {
    fn from(s: &str) -> Self {
        NodeGuid(s.to_string())
    }
}

impl From<String> for NodeGuid {
    fn from(s: String) -> Self {
        NodeGuid(s)
    }
}

/// Direction of a port. Connectors start at an output port and end at an
/// input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    Input,
    Output,
}

/// A (node, port index, direction) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId {
    pub owning_node: NodeGuid,
    pub port_index: usize,
    pub port_type: PortType,
}

impl PortId {
    pub fn new(owning_node: impl Into<NodeGuid>, port_index: usize, port_type: PortType) -> Self {
        PortId {
            owning_node: owning_node.into(),
            port_index,
            port_type,
        }
    }

    pub fn input(owning_node: impl Into<NodeGuid>, port_index: usize) -> Self {
        Self::new(owning_node, port_index, PortType::Input)
    }

    pub fn output(owning_node: impl Into<NodeGuid>, port_index: usize) -> Self {
        Self::new(owning_node, port_index, PortType::Output)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.port_type {
            PortType::Input => "in",
            PortType::Output => "out",
        };
        write!(f, "{}:{}[{}]", self.owning_node, dir, self.port_index)
    }
}
