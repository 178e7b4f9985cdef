use crate::error::Result;
use crate::graph::schedule_dag::ScheduleDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::debug;

pub struct ForwardPass<'a, 'g> {
    dag: &'a ScheduleDag<'g>,
}

impl<'a, 'g> ForwardPass<'a, 'g> {
    pub fn new(dag: &'a ScheduleDag<'g>) -> Self {
        Self { dag }
    }

    /// Earliest `(start, finish)` per task.
    ///
    /// A task starts once its slowest dependency finishes, or at 0 when it
    /// depends on nothing. Fails with `TimeOverflow` when a finish time does
    /// not fit in an `i64`.
    pub fn execute(&self) -> Result<HashMap<NodeIndex, (i64, i64)>> {
        let mut results: HashMap<NodeIndex, (i64, i64)> = HashMap::with_capacity(self.dag.order.len());

        for &node_ix in &self.dag.order {
            let early_start = self
                .dag
                .dependencies(node_ix)
                .into_iter()
                .filter_map(|dep| results.get(&dep).map(|&(_, ef)| ef))
                .max()
                .unwrap_or(0);
            let early_finish = early_start
                .checked_add(self.dag.duration(node_ix))
                .ok_or_else(|| self.dag.graph.overflow_error(node_ix))?;
            results.insert(node_ix, (early_start, early_finish));
        }

        debug!(tasks = results.len(), "forward pass complete");
        Ok(results)
    }
}

/// Project length: the latest earliest-finish, 0 for an empty project.
pub fn project_duration(early: &HashMap<NodeIndex, (i64, i64)>) -> i64 {
    early.values().map(|&(_, ef)| ef).max().unwrap_or(0)
}
