//! In-memory directed graph handed to the engines by the data layer.
//!
//! An edge `a -> b` in a task graph means "a depends on b". The layout engine
//! reads edges as stored; the scheduling engine reads the successors of a node
//! as the tasks that must finish before it may start.

use crate::attributes::{EdgeAttributes, NodeAttributes};
use crate::error::{Result, TaskGraphError};
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

pub mod algo;
pub mod loader;
pub mod schedule_dag;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub attributes: NodeAttributes,
}

#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    graph: DiGraph<GraphNode, EdgeAttributes>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or replace the attributes of an existing one.
    pub fn add_node(&mut self, id: impl Into<String>, attributes: NodeAttributes) -> NodeIndex {
        let id = id.into();
        if let Some(&ix) = self.id_to_index.get(&id) {
            self.graph[ix].attributes = attributes;
            return ix;
        }
        let ix = self.graph.add_node(GraphNode {
            id: id.clone(),
            attributes,
        });
        self.id_to_index.insert(id, ix);
        ix
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_edge_with(from, to, EdgeAttributes::new());
    }

    /// Add `from -> to`, creating either endpoint with default attributes if
    /// it is not yet known. A repeated edge overwrites the stored attributes.
    pub fn add_edge_with(&mut self, from: &str, to: &str, attributes: EdgeAttributes) {
        let u = self.ensure_node(from);
        let v = self.ensure_node(to);
        self.graph.update_edge(u, v, attributes);
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        match self.id_to_index.get(id) {
            Some(&ix) => ix,
            None => self.add_node(id, NodeAttributes::default()),
        }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeAttributes> {
        self.id_to_index.get(id).map(|&ix| &self.graph[ix].attributes)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttributes)> + '_ {
        self.graph
            .node_indices()
            .map(|ix| (self.graph[ix].id.as_str(), &self.graph[ix].attributes))
    }

    /// Edges as `(from, to, attributes)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeAttributes)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
                edge.weight(),
            )
        })
    }

    /// Nodes with an edge into `id`. Empty for unknown ids.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    /// Nodes `id` has an edge to. Empty for unknown ids.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&str> {
        match self.id_to_index.get(id) {
            Some(&ix) => self
                .sorted_neighbors(ix, direction)
                .into_iter()
                .map(|n| self.graph[n].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Weakly-connected components as lists of node ids.
    pub fn weakly_connected_components(&self) -> Vec<Vec<String>> {
        algo::weakly_connected_components(&self.graph)
            .into_iter()
            .map(|component| self.ids_of(&component))
            .collect()
    }

    /// Kahn layering of the whole graph.
    pub fn topological_generations(&self) -> Result<Vec<Vec<String>>> {
        let members: Vec<NodeIndex> = self.graph.node_indices().collect();
        let generations = algo::topological_generations(&self.graph, &members)
            .map_err(|ix| self.cycle_error(ix))?;
        Ok(generations.iter().map(|layer| self.ids_of(layer)).collect())
    }

    /// Copy of the graph restricted to `ids` and the edges between them.
    /// Unknown ids are ignored; node order follows this graph.
    pub fn induced_subgraph<'a, I>(&self, ids: I) -> DirectedGraph
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<NodeIndex> = ids
            .into_iter()
            .filter_map(|id| self.id_to_index.get(id).copied())
            .collect();
        self.filter_indices(|ix| keep.contains(&ix))
    }

    /// Copy of the graph keeping nodes whose attributes satisfy `predicate`,
    /// e.g. the members of one team.
    pub fn filter_nodes<F>(&self, mut predicate: F) -> DirectedGraph
    where
        F: FnMut(&str, &NodeAttributes) -> bool,
    {
        self.filter_indices(|ix| {
            let node = &self.graph[ix];
            predicate(&node.id, &node.attributes)
        })
    }

    fn filter_indices<F>(&self, mut keep: F) -> DirectedGraph
    where
        F: FnMut(NodeIndex) -> bool,
    {
        let mut out = DirectedGraph::new();
        for ix in self.graph.node_indices() {
            if keep(ix) {
                let node = &self.graph[ix];
                out.add_node(node.id.clone(), node.attributes.clone());
            }
        }
        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()].id;
            let to = &self.graph[edge.target()].id;
            if out.contains_node(from) && out.contains_node(to) {
                out.add_edge_with(from, to, edge.weight().clone());
            }
        }
        out
    }

    pub(crate) fn inner(&self) -> &DiGraph<GraphNode, EdgeAttributes> {
        &self.graph
    }

    pub(crate) fn id_of(&self, ix: NodeIndex) -> &str {
        &self.graph[ix].id
    }

    pub(crate) fn ids_of(&self, indices: &[NodeIndex]) -> Vec<String> {
        indices.iter().map(|&ix| self.graph[ix].id.clone()).collect()
    }

    /// Neighbours in insertion order; petgraph yields the newest edge first.
    pub(crate) fn sorted_neighbors(&self, ix: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(ix, direction).collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    pub(crate) fn cycle_error(&self, ix: NodeIndex) -> TaskGraphError {
        TaskGraphError::CyclicGraph {
            node: self.id_of(ix).to_string(),
        }
    }

    pub(crate) fn overflow_error(&self, ix: NodeIndex) -> TaskGraphError {
        TaskGraphError::TimeOverflow {
            node: self.id_of(ix).to_string(),
        }
    }
}
