//! Build a [`DirectedGraph`] from the graph store's JSON export.
//!
//! The export is `{"nodes": [...], "edges": [...]}` where every node document
//! carries `_id` and every edge document carries `_from` and `_to`. All other
//! document fields become attributes.

use super::DirectedGraph;
use crate::attributes::{EdgeAttributes, NodeAttributes};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDocument {
    #[serde(rename = "_from")]
    pub from: String,
    #[serde(rename = "_to")]
    pub to: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

impl GraphDocument {
    pub fn into_graph(self) -> DirectedGraph {
        let mut graph = DirectedGraph::new();
        for node in self.nodes {
            graph.add_node(node.id, NodeAttributes::from_document(node.fields));
        }
        for edge in self.edges {
            if !graph.contains_node(&edge.from) || !graph.contains_node(&edge.to) {
                debug!(from = %edge.from, to = %edge.to, "skipping edge to a node missing from the export");
                continue;
            }
            let attributes: EdgeAttributes = edge.fields;
            graph.add_edge_with(&edge.from, &edge.to, attributes);
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph document"
        );
        graph
    }
}

impl DirectedGraph {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(input)?;
        Ok(document.into_graph())
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let document: GraphDocument = serde_json::from_reader(reader)?;
        Ok(document.into_graph())
    }
}
