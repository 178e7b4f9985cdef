use super::{Layout, LayoutConfig, Position, centred_x};
use crate::attributes::SENIORITY_LAYER_COUNT;
use crate::graph::DirectedGraph;
use tracing::debug;

/// Employees grouped by seniority, leadership first, empty layers dropped.
/// Within a layer nodes keep graph insertion order.
pub fn seniority_layers(graph: &DirectedGraph) -> Vec<Vec<String>> {
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); SENIORITY_LAYER_COUNT];
    for (id, attributes) in graph.nodes() {
        layers[attributes.seniority_layer()].push(id.to_string());
    }
    layers.retain(|layer| !layer.is_empty());
    layers
}

/// Top-down hierarchy layout: layer `k` sits at `y = k * layer_height`, each
/// layer centred on `x = 0`. Nodes without a seniority go to the mid-level
/// layer.
pub fn seniority_layout(graph: &DirectedGraph, config: &LayoutConfig) -> Layout {
    let layers = seniority_layers(graph);
    let mut layout = Layout::preset(config.hints.clone());

    for (level, layer) in layers.iter().enumerate() {
        let y = level as f64 * config.layer_height;
        for (slot, id) in layer.iter().enumerate() {
            let x = centred_x(slot, layer.len(), config.node_spacing);
            layout.positions.insert(id.clone(), Position::new(x, y));
        }
    }

    debug!(layers = layers.len(), nodes = layout.positions.len(), "seniority layout complete");
    layout
}
