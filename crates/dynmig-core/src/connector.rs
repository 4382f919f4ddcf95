//! Connector elements.
//!
//! A connector is stored as a flat element in the connector section:
//!
//! ```xml
//! <Dynamo.Models.ConnectorModel start="<guid>" start_index="0"
//!     end="<guid>" end_index="1" portType="0" />
//! ```
//!
//! `start` names the node owning the OUTPUT port the edge leaves from, `end`
//! the node owning the INPUT port it arrives at. Nodes are referenced by
//! guid only; nothing in the tree structure ties a connector to its nodes.

use serde::{Deserialize, Serialize};

use crate::document::Element;
use crate::error::CoreError;
use crate::id::{NodeGuid, PortId, PortType};

pub const CONNECTOR_TAG: &str = "Dynamo.Models.ConnectorModel";
pub const START_ATTRIBUTE: &str = "start";
pub const START_INDEX_ATTRIBUTE: &str = "start_index";
pub const END_ATTRIBUTE: &str = "end";
pub const END_INDEX_ATTRIBUTE: &str = "end_index";
pub const PORT_TYPE_ATTRIBUTE: &str = "portType";

/// A parsed view of a connector element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub start: NodeGuid,
    pub start_index: usize,
    pub end: NodeGuid,
    pub end_index: usize,
}

impl Connector {
    pub fn new(start: NodeGuid, start_index: usize, end: NodeGuid, end_index: usize) -> Self {
        Connector {
            start,
            start_index,
            end,
            end_index,
        }
    }

    /// Reads a connector element. Missing or non-numeric endpoint attributes
    /// are reported as [`CoreError::MissingAttribute`].
    pub fn from_element(element: &Element) -> Result<Self, CoreError> {
        let index = |name: &str| -> Result<usize, CoreError> {
            element
                .require_attribute(name)?
                .trim()
                .parse::<usize>()
                .map_err(|_| CoreError::MissingAttribute {
                    element: element.name().to_string(),
                    attribute: name.to_string(),
                })
        };

        Ok(Connector {
            start: NodeGuid::from(element.require_attribute(START_ATTRIBUTE)?),
            start_index: index(START_INDEX_ATTRIBUTE)?,
            end: NodeGuid::from(element.require_attribute(END_ATTRIBUTE)?),
            end_index: index(END_INDEX_ATTRIBUTE)?,
        })
    }

    pub fn to_element(&self) -> Element {
        Element::new(CONNECTOR_TAG)
            .with_attribute(START_ATTRIBUTE, self.start.as_str())
            .with_attribute(START_INDEX_ATTRIBUTE, self.start_index.to_string())
            .with_attribute(END_ATTRIBUTE, self.end.as_str())
            .with_attribute(END_INDEX_ATTRIBUTE, self.end_index.to_string())
            .with_attribute(PORT_TYPE_ATTRIBUTE, "0")
    }

    /// The output port this connector leaves from.
    pub fn start_port(&self) -> PortId {
        PortId::output(self.start.clone(), self.start_index)
    }

    /// The input port this connector arrives at.
    pub fn end_port(&self) -> PortId {
        PortId::input(self.end.clone(), self.end_index)
    }
}

/// Returns `true` if the connector element touches `port`.
///
/// Compared as raw attribute text so that elements with malformed indices on
/// the other end still match.
pub fn element_touches_port(element: &Element, port: &PortId) -> bool {
    let (node_attr, index_attr) = endpoint_attributes(port.port_type);
    element.attribute(node_attr) == Some(port.owning_node.as_str())
        && element
            .attribute(index_attr)
            .and_then(|s| s.trim().parse::<usize>().ok())
            == Some(port.port_index)
}

/// Points one end of a connector element at `port`.
pub fn redirect_element(element: &mut Element, port: &PortId) {
    let (node_attr, index_attr) = endpoint_attributes(port.port_type);
    element.set_attribute(node_attr, port.owning_node.as_str());
    element.set_attribute(index_attr, port.port_index.to_string());
}

fn endpoint_attributes(port_type: PortType) -> (&'static str, &'static str) {
    match port_type {
        PortType::Output => (START_ATTRIBUTE, START_INDEX_ATTRIBUTE),
        PortType::Input => (END_ATTRIBUTE, END_INDEX_ATTRIBUTE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> Connector {
        Connector::new(NodeGuid::from("a"), 0, NodeGuid::from("b"), 2)
    }

    #[test]
    fn element_roundtrip() {
        let el = connector().to_element();
        assert_eq!(el.name(), CONNECTOR_TAG);
        assert_eq!(el.attribute(PORT_TYPE_ATTRIBUTE), Some("0"));
        assert_eq!(Connector::from_element(&el).unwrap(), connector());
    }

    #[test]
    fn bad_index_is_reported() {
        let el = connector()
            .to_element()
            .with_attribute(END_INDEX_ATTRIBUTE, "two");
        assert!(matches!(
            Connector::from_element(&el),
            Err(CoreError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn touches_port_respects_direction() {
        let el = connector().to_element();
        assert!(element_touches_port(&el, &PortId::output("a", 0)));
        assert!(element_touches_port(&el, &PortId::input("b", 2)));
        assert!(!element_touches_port(&el, &PortId::input("a", 0)));
        assert!(!element_touches_port(&el, &PortId::input("b", 1)));
    }

    #[test]
    fn redirect_rewrites_only_one_end() {
        let mut el = connector().to_element();
        redirect_element(&mut el, &PortId::input("c", 5));
        let c = Connector::from_element(&el).unwrap();
        assert_eq!(c.start, NodeGuid::from("a"));
        assert_eq!(c.start_index, 0);
        assert_eq!(c.end, NodeGuid::from("c"));
        assert_eq!(c.end_index, 5);
    }

    #[test]
    fn ports_have_expected_direction() {
        let c = connector();
        assert_eq!(c.start_port(), PortId::output("a", 0));
        assert_eq!(c.end_port(), PortId::input("b", 2));
    }
}
