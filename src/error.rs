//! Crate-wide error type.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskGraphError {
    /// No topological order exists; `node` is one task that sits on a cycle.
    #[error("cannot schedule: cyclic dependency detected at {node}")]
    CyclicGraph { node: String },

    /// A start or finish time left the `i64` range; `node` is the task being
    /// timed when it happened.
    #[error("cannot schedule: time overflow at {node}")]
    TimeOverflow { node: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("graph document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, TaskGraphError>;
