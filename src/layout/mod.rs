//! Deterministic node coordinates for the graph rendering widget.
//!
//! Two strategies share one output shape, a preset [`Layout`]:
//! - [`layered_layout_from_forest`] for task dependency forests
//! - [`seniority_layout`] for organisational hierarchies
//!
//! Neither strategy fails for a well-formed graph, and neither uses any
//! randomness: the same graph built in the same order always yields the same
//! positions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod config;
pub mod layered;
pub mod seniority;

pub use config::{LayoutConfig, RenderHints};
pub use layered::{ForestDecomposition, extract_dag_components, layered_layout_from_forest};
pub use seniority::{seniority_layers, seniority_layout};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Preset layout descriptor, serialised the way the widget expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub name: &'static str,
    pub positions: IndexMap<String, Position>,
    #[serde(flatten)]
    pub hints: RenderHints,
    /// Nodes left without a position because their component is cyclic.
    #[serde(skip)]
    pub excluded: Vec<String>,
}

impl Layout {
    pub(crate) fn preset(hints: RenderHints) -> Self {
        Self {
            name: "preset",
            positions: IndexMap::new(),
            hints,
            excluded: Vec::new(),
        }
    }

    pub fn position(&self, node_id: &str) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// `x` for slot `index` of a layer holding `width` nodes, centred on 0.
pub(crate) fn centred_x(index: usize, width: usize, spacing: f64) -> f64 {
    (index as i64 - (width / 2) as i64) as f64 * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centring_puts_the_middle_slot_at_zero() {
        let xs: Vec<f64> = (0..3).map(|i| centred_x(i, 3, 100.0)).collect();
        assert_eq!(xs, vec![-100.0, 0.0, 100.0]);
        let xs: Vec<f64> = (0..2).map(|i| centred_x(i, 2, 100.0)).collect();
        assert_eq!(xs, vec![-100.0, 0.0]);
    }

    #[test]
    fn serialises_as_preset_descriptor() {
        let mut layout = Layout::preset(RenderHints::default());
        layout
            .positions
            .insert("task/1".to_string(), Position::new(0.0, -100.0));
        layout.excluded.push("task/2".to_string());

        let json = layout.to_json().unwrap();
        assert_eq!(json["name"], "preset");
        assert_eq!(json["positions"]["task/1"]["y"], -100.0);
        assert_eq!(json["spacingFactor"], 1.0);
        assert_eq!(json["animationDuration"], 500);
        assert!(json.get("excluded").is_none());
    }
}
