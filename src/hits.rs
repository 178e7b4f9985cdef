//! HITS hub and authority ranking over an interaction graph.
//!
//! On an employee interaction graph a hub reaches out to many colleagues that
//! others also turn to, and an authority is the colleague people turn to. Hub
//! scores point at the managerial track, authority scores at the technical one.
//!
//! Scores come from power iteration: authorities collect the hub score of
//! every node linking to them, hubs collect the authority score of every node
//! they link to, and both vectors are rescaled by their maximum each round.
//! The final vectors are normalised to sum to 1.

use crate::error::{Result, TaskGraphError};
use crate::graph::DirectedGraph;
use crate::schedule::strip_collection_prefix;
use petgraph::visit::EdgeRef;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

pub const EMP_ID_COLUMN: &str = "EmpID";
pub const HUB_SCORE_COLUMN: &str = "Hub_Score";
pub const AUTHORITY_SCORE_COLUMN: &str = "Authority_Score";

/// Edge attribute read as the link weight. Missing, negative or non-numeric
/// values count as 1.
pub const WEIGHT_KEY: &str = "weight";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitsConfig {
    /// Hard cap on power-iteration rounds.
    pub max_iterations: usize,
    /// Convergence threshold per node: iteration stops once the summed hub
    /// change drops below `tolerance * node_count`.
    pub tolerance: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1.0e-8,
        }
    }
}

impl HitsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(TaskGraphError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(TaskGraphError::InvalidConfig(format!(
                "tolerance must be a positive number (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsEntry {
    #[serde(rename = "NodeID")]
    pub node_id: String,
    #[serde(rename = "EmpID")]
    pub emp_id: String,
    #[serde(rename = "Hub_Score")]
    pub hub_score: f64,
    #[serde(rename = "Authority_Score")]
    pub authority_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitsAnalysis {
    entries: Vec<HitsEntry>,
    by_node: HashMap<String, usize>,
    iterations: usize,
    converged: bool,
}

impl HitsAnalysis {
    /// Rows ordered by hub score, highest first; ties keep graph insertion
    /// order.
    pub fn entries(&self) -> &[HitsEntry] {
        &self.entries
    }

    pub fn entry(&self, node_id: &str) -> Option<&HitsEntry> {
        self.by_node.get(node_id).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Power-iteration rounds actually run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// False when the iteration cap was hit first; the scores are then the
    /// last iterate.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn top_hubs(&self, limit: usize) -> &[HitsEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Highest authority scores first; ties keep the hub ranking.
    pub fn top_authorities(&self, limit: usize) -> Vec<&HitsEntry> {
        let mut ranked: Vec<&HitsEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.authority_score.total_cmp(&a.authority_score));
        ranked.truncate(limit);
        ranked
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let emp_ids: Vec<String> = self.entries.iter().map(|e| e.emp_id.clone()).collect();
        let hubs: Vec<f64> = self.entries.iter().map(|e| e.hub_score).collect();
        let authorities: Vec<f64> = self.entries.iter().map(|e| e.authority_score).collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static(EMP_ID_COLUMN), emp_ids).into_column(),
            Series::new(PlSmallStr::from_static(HUB_SCORE_COLUMN), hubs).into_column(),
            Series::new(PlSmallStr::from_static(AUTHORITY_SCORE_COLUMN), authorities)
                .into_column(),
        ])
    }
}

/// Hub and authority scores for every node of `graph`.
///
/// A graph without edges gives every node 0 for both scores.
pub fn hits_from_graph(graph: &DirectedGraph, config: &HitsConfig) -> Result<HitsAnalysis> {
    config.validate()?;

    let inner = graph.inner();
    let n = inner.node_count();
    let links: Vec<(usize, usize, f64)> = inner
        .edge_references()
        .map(|edge| (edge.source().index(), edge.target().index(), link_weight(edge.weight())))
        .collect();

    let mut hubs = vec![1.0 / n.max(1) as f64; n];
    let mut authorities = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = n == 0;
    let threshold = config.tolerance * n as f64;

    while !converged && iterations < config.max_iterations {
        iterations += 1;

        let mut next_authorities = vec![0.0; n];
        for &(from, to, weight) in &links {
            next_authorities[to] += hubs[from] * weight;
        }
        let mut next_hubs = vec![0.0; n];
        for &(from, to, weight) in &links {
            next_hubs[from] += next_authorities[to] * weight;
        }
        scale_by_max(&mut next_hubs);
        scale_by_max(&mut next_authorities);

        let change: f64 = next_hubs
            .iter()
            .zip(&hubs)
            .map(|(next, last)| (next - last).abs())
            .sum();
        hubs = next_hubs;
        authorities = next_authorities;
        converged = change < threshold;
    }

    if !converged {
        warn!(
            iterations,
            nodes = n,
            "HITS stopped at the iteration cap before converging"
        );
    }
    normalise_sum(&mut hubs);
    normalise_sum(&mut authorities);

    let mut entries: Vec<HitsEntry> = inner
        .node_indices()
        .map(|ix| {
            let node_id = graph.id_of(ix);
            HitsEntry {
                node_id: node_id.to_string(),
                emp_id: strip_collection_prefix(node_id).to_string(),
                hub_score: hubs[ix.index()],
                authority_score: authorities[ix.index()],
            }
        })
        .collect();
    entries.sort_by(|a, b| b.hub_score.total_cmp(&a.hub_score));

    let by_node = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.node_id.clone(), idx))
        .collect();

    info!(nodes = n, edges = links.len(), iterations, converged, "HITS ranking complete");

    Ok(HitsAnalysis {
        entries,
        by_node,
        iterations,
        converged,
    })
}

/// Convenience for table consumers: the `EmpID, Hub_Score, Authority_Score`
/// frame with default settings, highest hub first.
pub fn hits_table(graph: &DirectedGraph) -> Result<DataFrame> {
    Ok(hits_from_graph(graph, &HitsConfig::default())?.to_dataframe()?)
}

fn link_weight(attributes: &serde_json::Map<String, Value>) -> f64 {
    attributes
        .get(WEIGHT_KEY)
        .and_then(Value::as_f64)
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(1.0)
}

fn scale_by_max(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(0.0, f64::max);
    if max > 0.0 && max.is_finite() {
        scores.iter_mut().for_each(|s| *s /= max);
    }
}

fn normalise_sum(scores: &mut [f64]) {
    let total: f64 = scores.iter().sum();
    if total > 0.0 && total.is_finite() {
        scores.iter_mut().for_each(|s| *s /= total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weights_fall_back_to_one() {
        let weighted = json!({"weight": 2.5}).as_object().cloned().unwrap();
        let negative = json!({"weight": -3}).as_object().cloned().unwrap();
        let text = json!({"weight": "heavy"}).as_object().cloned().unwrap();
        assert_eq!(link_weight(&weighted), 2.5);
        assert_eq!(link_weight(&negative), 1.0);
        assert_eq!(link_weight(&text), 1.0);
        assert_eq!(link_weight(&serde_json::Map::new()), 1.0);
    }

    #[test]
    fn all_zero_vectors_are_left_alone() {
        let mut scores = vec![0.0, 0.0];
        scale_by_max(&mut scores);
        normalise_sum(&mut scores);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn config_rejects_zero_iterations_and_bad_tolerance() {
        let no_rounds = HitsConfig {
            max_iterations: 0,
            ..HitsConfig::default()
        };
        assert!(matches!(no_rounds.validate(), Err(TaskGraphError::InvalidConfig(_))));

        let loose = HitsConfig {
            tolerance: f64::NAN,
            ..HitsConfig::default()
        };
        assert!(loose.validate().is_err());
        assert!(HitsConfig::default().validate().is_ok());
    }
}
