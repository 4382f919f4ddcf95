//! Connector integrity check.
//!
//! Connectors reference nodes by guid only, so a node rule that replaces a
//! node without rewiring its connectors leaves edges pointing at a guid that
//! no longer exists. Migration itself never reports this. [`ConnectorGraph`]
//! rebuilds the node/connector graph after the fact and lists every
//! connector that does not resolve.

use std::collections::HashMap;

use dynmig_core::{Connector, Document, NodeGuid};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// A connector that cannot be placed in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorIssue {
    /// One or both endpoint guids match no node element.
    Dangling {
        /// Position within the connector section.
        position: usize,
        connector: Connector,
        missing: Vec<NodeGuid>,
    },
    /// The connector element's endpoint attributes could not be read.
    Malformed { position: usize, reason: String },
}

/// Node guids connected by resolvable connectors.
#[derive(Debug, Clone)]
pub struct ConnectorGraph {
    graph: DiGraph<NodeGuid, Connector>,
    indices: HashMap<NodeGuid, NodeIndex>,
    issues: Vec<ConnectorIssue>,
}

impl ConnectorGraph {
    /// Builds the graph from a document's node and connector sections.
    pub fn from_document(document: &Document) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for node in document.nodes() {
            if let Some(guid) = node.guid() {
                indices
                    .entry(guid.clone())
                    .or_insert_with(|| graph.add_node(guid));
            }
        }

        let mut issues = Vec::new();
        for (position, element) in document.connectors().iter().enumerate() {
            let connector = match Connector::from_element(element) {
                Ok(c) => c,
                Err(e) => {
                    issues.push(ConnectorIssue::Malformed {
                        position,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let start = indices.get(&connector.start).copied();
            let end = indices.get(&connector.end).copied();
            match (start, end) {
                (Some(s), Some(e)) => {
                    graph.add_edge(s, e, connector);
                }
                _ => {
                    let mut missing = Vec::new();
                    if start.is_none() {
                        missing.push(connector.start.clone());
                    }
                    if end.is_none() {
                        missing.push(connector.end.clone());
                    }
                    issues.push(ConnectorIssue::Dangling {
                        position,
                        connector,
                        missing,
                    });
                }
            }
        }

        ConnectorGraph {
            graph,
            indices,
            issues,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connectors that resolved on both ends.
    pub fn connector_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connectors that could not be resolved, in document order.
    pub fn issues(&self) -> &[ConnectorIssue] {
        &self.issues
    }

    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    /// Guids of nodes feeding into `guid`, sorted.
    pub fn upstream(&self, guid: &NodeGuid) -> Vec<NodeGuid> {
        self.neighbors(guid, Direction::Incoming)
    }

    /// Guids of nodes fed by `guid`, sorted.
    pub fn downstream(&self, guid: &NodeGuid) -> Vec<NodeGuid> {
        self.neighbors(guid, Direction::Outgoing)
    }

    fn neighbors(&self, guid: &NodeGuid, direction: Direction) -> Vec<NodeGuid> {
        let Some(&idx) = self.indices.get(guid) else {
            return Vec::new();
        };
        let mut guids: Vec<NodeGuid> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        guids.sort();
        guids.dedup();
        guids
    }
}

/// Convenience wrapper returning only the unresolved connectors.
pub fn find_dangling_connectors(document: &Document) -> Vec<ConnectorIssue> {
    ConnectorGraph::from_document(document).issues
}
