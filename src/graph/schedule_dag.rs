use super::DirectedGraph;
use crate::error::Result;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Scheduling view of a task graph: durations in a side table and a
/// dependencies-first topological order. The caller's graph is not touched.
pub struct ScheduleDag<'a> {
    pub graph: &'a DirectedGraph,
    pub durations: HashMap<NodeIndex, i64>,
    pub order: Vec<NodeIndex>,
}

impl<'a> ScheduleDag<'a> {
    pub fn build(graph: &'a DirectedGraph) -> Result<Self> {
        let inner = graph.inner();

        let mut durations: HashMap<NodeIndex, i64> = HashMap::with_capacity(inner.node_count());
        for ix in inner.node_indices() {
            durations.insert(ix, inner[ix].attributes.duration());
        }

        // Edges point from a task to what it depends on, so toposort lists
        // dependents first.
        let mut order = toposort(inner, None).map_err(|cycle| graph.cycle_error(cycle.node_id()))?;
        order.reverse();

        Ok(Self {
            graph,
            durations,
            order,
        })
    }

    pub fn duration(&self, ix: NodeIndex) -> i64 {
        self.durations.get(&ix).copied().unwrap_or(0)
    }

    /// Tasks that must finish before `ix` may start.
    pub fn dependencies(&self, ix: NodeIndex) -> Vec<NodeIndex> {
        self.graph.sorted_neighbors(ix, Direction::Outgoing)
    }

    /// Tasks waiting on `ix`.
    pub fn dependents(&self, ix: NodeIndex) -> Vec<NodeIndex> {
        self.graph.sorted_neighbors(ix, Direction::Incoming)
    }
}
