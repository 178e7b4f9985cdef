pub mod attributes;
pub mod calculations;
pub mod error;
pub mod graph;
pub mod hits;
pub mod layout;
pub mod logging;
pub mod schedule;

pub use attributes::{EdgeAttributes, NodeAttributes, Seniority};
pub use error::{Result, TaskGraphError};
pub use graph::DirectedGraph;
pub use graph::loader::GraphDocument;
pub use hits::{HitsAnalysis, HitsConfig, HitsEntry, hits_from_graph, hits_table};
pub use layout::{
    ForestDecomposition, Layout, LayoutConfig, Position, RenderHints, extract_dag_components,
    layered_layout_from_forest, seniority_layers, seniority_layout,
};
pub use schedule::{
    CriticalPathAnalysis, DEFAULT_NEXT_TASKS, ScheduleEntry, ScheduleRow, cpm_table,
    schedule_from_dag, strip_collection_prefix,
};
