//! Critical Path Method over a task dependency graph.
//!
//! [`schedule_from_dag`] fails closed: a graph with any cycle produces
//! [`TaskGraphError::CyclicGraph`](crate::TaskGraphError::CyclicGraph) and no
//! rows at all. The layout engine deliberately behaves differently, see
//! [`crate::layout::layered_layout_from_forest`].

use crate::calculations::{BackwardPass, ForwardPass, project_duration};
use crate::error::Result;
use crate::graph::DirectedGraph;
use crate::graph::schedule_dag::ScheduleDag;
use petgraph::graph::NodeIndex;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// How many rows answer "what should I work on next" by default.
pub const DEFAULT_NEXT_TASKS: usize = 5;

pub const TASK_ID_COLUMN: &str = "TaskID";
pub const EARLIEST_START_COLUMN: &str = "earliest_start";
pub const SLACK_TIME_COLUMN: &str = "slack_time";
pub const LATEST_START_COLUMN: &str = "latest_start";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "NodeID")]
    pub node_id: String,
    #[serde(rename = "TaskID")]
    pub task_id: String,
    pub duration: i64,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    pub slack_time: i64,
}

impl ScheduleEntry {
    pub fn is_critical(&self) -> bool {
        self.slack_time == 0
    }
}

/// One row of the table returned by [`CriticalPathAnalysis::to_dataframe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    pub earliest_start: i64,
    pub slack_time: i64,
    pub latest_start: i64,
}

impl ScheduleRow {
    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let task_id = df
            .column(TASK_ID_COLUMN)?
            .str()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("schedule row missing TaskID".into()))?
            .to_string();

        let int_at = |name: &str| -> PolarsResult<i64> {
            df.column(name)?.i64()?.get(row_idx).ok_or_else(|| {
                PolarsError::ComputeError(format!("schedule row missing {name}").into())
            })
        };

        Ok(Self {
            task_id,
            earliest_start: int_at(EARLIEST_START_COLUMN)?,
            slack_time: int_at(SLACK_TIME_COLUMN)?,
            latest_start: int_at(LATEST_START_COLUMN)?,
        })
    }
}

impl From<&ScheduleEntry> for ScheduleRow {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            task_id: entry.task_id.clone(),
            earliest_start: entry.earliest_start,
            slack_time: entry.slack_time,
            latest_start: entry.latest_start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPathAnalysis {
    entries: Vec<ScheduleEntry>,
    by_node: HashMap<String, usize>,
    project_duration: i64,
    critical_path: Vec<String>,
}

impl CriticalPathAnalysis {
    /// Rows ordered by `(latest_start, slack_time)`; remaining ties keep graph
    /// insertion order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entry(&self, node_id: &str) -> Option<&ScheduleEntry> {
        self.by_node.get(node_id).map(|&idx| &self.entries[idx])
    }

    pub fn project_duration(&self) -> i64 {
        self.project_duration
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node ids of one zero-slack chain, from a task with no dependencies to
    /// a task nothing depends on. Empty only for an empty graph.
    pub fn critical_path(&self) -> &[String] {
        &self.critical_path
    }

    /// The tasks to pick up first: tightest deadline, then least buffer.
    pub fn next_tasks(&self, limit: usize) -> &[ScheduleEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let rows: Vec<ScheduleRow> = self.entries.iter().map(ScheduleRow::from).collect();

        let task_ids: Vec<String> = rows.iter().map(|r| r.task_id.clone()).collect();
        let earliest: Vec<i64> = rows.iter().map(|r| r.earliest_start).collect();
        let slack: Vec<i64> = rows.iter().map(|r| r.slack_time).collect();
        let latest: Vec<i64> = rows.iter().map(|r| r.latest_start).collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static(TASK_ID_COLUMN), task_ids).into_column(),
            Series::new(PlSmallStr::from_static(EARLIEST_START_COLUMN), earliest).into_column(),
            Series::new(PlSmallStr::from_static(SLACK_TIME_COLUMN), slack).into_column(),
            Series::new(PlSmallStr::from_static(LATEST_START_COLUMN), latest).into_column(),
        ])
    }

    /// Table rows with zero slack.
    pub fn critical_tasks(&self) -> PolarsResult<DataFrame> {
        self.to_dataframe()?
            .lazy()
            .filter(col(SLACK_TIME_COLUMN).eq(lit(0i64)))
            .collect()
    }
}

/// `"task/ABC123"` becomes `"ABC123"`; ids without a collection pass through.
pub fn strip_collection_prefix(node_id: &str) -> &str {
    node_id
        .split_once('/')
        .map(|(_, key)| key)
        .unwrap_or(node_id)
}

/// Run the forward and backward passes and rank every task.
pub fn schedule_from_dag(graph: &DirectedGraph) -> Result<CriticalPathAnalysis> {
    let dag = ScheduleDag::build(graph)?;

    let early = ForwardPass::new(&dag).execute()?;
    let project_duration = project_duration(&early);
    let late = BackwardPass::new(&dag).execute(project_duration)?;

    let mut entries: Vec<ScheduleEntry> = graph
        .inner()
        .node_indices()
        .map(|ix| -> Result<ScheduleEntry> {
            let (earliest_start, earliest_finish) = early[&ix];
            let (latest_start, latest_finish) = late[&ix];
            let slack_time = latest_start
                .checked_sub(earliest_start)
                .ok_or_else(|| graph.overflow_error(ix))?;
            let node_id = graph.id_of(ix);
            Ok(ScheduleEntry {
                node_id: node_id.to_string(),
                task_id: strip_collection_prefix(node_id).to_string(),
                duration: dag.duration(ix),
                earliest_start,
                earliest_finish,
                latest_start,
                latest_finish,
                slack_time,
            })
        })
        .collect::<Result<_>>()?;
    entries.sort_by_key(|entry| (entry.latest_start, entry.slack_time));

    let by_node = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.node_id.clone(), idx))
        .collect();

    let critical_path = trace_critical_path(&dag, &early, &late);
    info!(
        tasks = entries.len(),
        project_duration,
        critical_path_len = critical_path.len(),
        "critical path analysis complete"
    );

    Ok(CriticalPathAnalysis {
        entries,
        by_node,
        project_duration,
        critical_path,
    })
}

/// Convenience for table consumers: the ranked `TaskID, earliest_start,
/// slack_time, latest_start` frame.
pub fn cpm_table(graph: &DirectedGraph) -> Result<DataFrame> {
    Ok(schedule_from_dag(graph)?.to_dataframe()?)
}

fn trace_critical_path(
    dag: &ScheduleDag<'_>,
    early: &HashMap<NodeIndex, (i64, i64)>,
    late: &HashMap<NodeIndex, (i64, i64)>,
) -> Vec<String> {
    let slack = |ix: NodeIndex| late[&ix].0 - early[&ix].0;

    let start = dag
        .graph
        .inner()
        .node_indices()
        .find(|&ix| dag.dependencies(ix).is_empty() && slack(ix) == 0);

    let mut path = Vec::new();
    let mut current = start;
    while let Some(ix) = current {
        path.push(dag.graph.id_of(ix).to_string());
        let finish = early[&ix].1;
        current = dag
            .dependents(ix)
            .into_iter()
            .find(|&next| slack(next) == 0 && early[&next].0 == finish);
    }
    path
}
