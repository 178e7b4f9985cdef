use crate::error::Result;
use crate::graph::schedule_dag::ScheduleDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::debug;

pub struct BackwardPass<'a, 'g> {
    dag: &'a ScheduleDag<'g>,
}

impl<'a, 'g> BackwardPass<'a, 'g> {
    pub fn new(dag: &'a ScheduleDag<'g>) -> Self {
        Self { dag }
    }

    /// Latest `(start, finish)` per task that still meets `project_duration`.
    pub fn execute(&self, project_duration: i64) -> Result<HashMap<NodeIndex, (i64, i64)>> {
        let mut results: HashMap<NodeIndex, (i64, i64)> = HashMap::with_capacity(self.dag.order.len());

        // Reverse topological order: every dependent is settled first
        for &node_ix in self.dag.order.iter().rev() {
            let late_finish = self
                .dag
                .dependents(node_ix)
                .into_iter()
                .filter_map(|succ| results.get(&succ).map(|&(ls, _)| ls))
                .min()
                .unwrap_or(project_duration);
            let late_start = late_finish
                .checked_sub(self.dag.duration(node_ix))
                .ok_or_else(|| self.dag.graph.overflow_error(node_ix))?;
            results.insert(node_ix, (late_start, late_finish));
        }

        debug!(tasks = results.len(), project_duration, "backward pass complete");
        Ok(results)
    }
}
