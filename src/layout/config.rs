use crate::error::{Result, TaskGraphError};
use serde::{Deserialize, Serialize};

/// Options the rendering widget receives unchanged alongside the positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderHints {
    pub fit: bool,
    pub padding: u32,
    pub spacing_factor: f64,
    pub animate: bool,
    pub animation_duration: u64,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            fit: true,
            padding: 30,
            spacing_factor: 1.0,
            animate: false,
            animation_duration: 500,
        }
    }
}

/// Spacing used by both layout strategies, in renderer units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance between consecutive layers.
    pub layer_height: f64,
    /// Horizontal distance between nodes of one layer.
    pub node_spacing: f64,
    /// Extra horizontal gap between neighbouring DAG components.
    pub dag_gap: f64,
    /// Cell size of the grid holding isolated nodes.
    pub single_node_spacing: f64,
    pub hints: RenderHints,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_height: 100.0,
            node_spacing: 100.0,
            dag_gap: 100.0,
            single_node_spacing: 100.0,
            hints: RenderHints::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let spacings = [
            ("layer_height", self.layer_height),
            ("node_spacing", self.node_spacing),
            ("single_node_spacing", self.single_node_spacing),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value <= 0.0 {
                return Err(TaskGraphError::InvalidConfig(format!(
                    "{name} must be a positive number (got {value})"
                )));
            }
        }
        if !self.dag_gap.is_finite() || self.dag_gap < 0.0 {
            return Err(TaskGraphError::InvalidConfig(format!(
                "dag_gap must be zero or positive (got {})",
                self.dag_gap
            )));
        }
        if !self.hints.spacing_factor.is_finite() || self.hints.spacing_factor <= 0.0 {
            return Err(TaskGraphError::InvalidConfig(format!(
                "spacingFactor must be a positive number (got {})",
                self.hints.spacing_factor
            )));
        }
        Ok(())
    }
}
