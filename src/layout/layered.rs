use super::{Layout, LayoutConfig, Position, centred_x};
use crate::graph::DirectedGraph;
use crate::graph::algo::{topological_generations, weakly_connected_components};
use petgraph::graph::NodeIndex;
use tracing::{debug, warn};

/// A directed graph split into its weakly-connected components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestDecomposition {
    /// Acyclic components of two or more nodes, each as its topological
    /// generations.
    pub dags: Vec<Vec<Vec<String>>>,
    /// Components made of a single node.
    pub isolated: Vec<String>,
    /// Components of two or more nodes that contain a cycle.
    pub cyclic: Vec<Vec<String>>,
}

struct Parts {
    dags: Vec<Vec<Vec<NodeIndex>>>,
    isolated: Vec<NodeIndex>,
    cyclic: Vec<Vec<NodeIndex>>,
}

fn decompose(graph: &DirectedGraph) -> Parts {
    let inner = graph.inner();
    let mut parts = Parts {
        dags: Vec::new(),
        isolated: Vec::new(),
        cyclic: Vec::new(),
    };

    for component in weakly_connected_components(inner) {
        if component.len() == 1 {
            parts.isolated.push(component[0]);
            continue;
        }
        match topological_generations(inner, &component) {
            Ok(generations) => parts.dags.push(generations),
            Err(_) => parts.cyclic.push(component),
        }
    }
    parts
}

pub fn extract_dag_components(graph: &DirectedGraph) -> ForestDecomposition {
    let parts = decompose(graph);
    ForestDecomposition {
        dags: parts
            .dags
            .iter()
            .map(|generations| generations.iter().map(|layer| graph.ids_of(layer)).collect())
            .collect(),
        isolated: graph.ids_of(&parts.isolated),
        cyclic: parts.cyclic.iter().map(|c| graph.ids_of(c)).collect(),
    }
}

/// Topological layered layout for a forest of task DAGs.
///
/// Each DAG is laid out by generation, one row per generation going up the
/// screen (`y = -generation * layer_height`), each row centred on the DAG's
/// anchor column. The first DAG is centred on `x = 0`; every later DAG is
/// left-aligned to a running offset that grows by
/// `widest_row * node_spacing + dag_gap` per DAG, so DAGs never overlap.
/// Single-node components follow in a square-ish grid.
///
/// Components that turn out to be cyclic are left out of the layout and
/// listed in [`Layout::excluded`]. This is not an error: a stray cycle in the
/// data should not stop the rest of the graph from being drawn.
pub fn layered_layout_from_forest(graph: &DirectedGraph, config: &LayoutConfig) -> Layout {
    let parts = decompose(graph);
    let mut layout = Layout::preset(config.hints.clone());
    let spacing = config.node_spacing;
    let mut running_offset = 0.0;

    for (dag_idx, generations) in parts.dags.iter().enumerate() {
        let widest = generations.iter().map(Vec::len).max().unwrap_or(0);
        let anchor = if dag_idx == 0 {
            0.0
        } else {
            running_offset + (widest / 2) as f64 * spacing
        };

        for (level, layer) in generations.iter().enumerate() {
            // 0.0 - .. keeps the top row at +0.0 rather than -0.0
            let y = 0.0 - level as f64 * config.layer_height;
            for (slot, &ix) in layer.iter().enumerate() {
                let x = anchor + centred_x(slot, layer.len(), spacing);
                layout
                    .positions
                    .insert(graph.id_of(ix).to_string(), Position::new(x, y));
            }
        }

        running_offset += widest as f64 * spacing + config.dag_gap;
    }

    let columns = grid_columns(parts.isolated.len());
    for (i, &ix) in parts.isolated.iter().enumerate() {
        let (row, col) = (i / columns, i % columns);
        let x = running_offset + col as f64 * config.single_node_spacing;
        let y = row as f64 * config.single_node_spacing;
        layout
            .positions
            .insert(graph.id_of(ix).to_string(), Position::new(x, y));
    }

    for component in &parts.cyclic {
        let ids = graph.ids_of(component);
        warn!(size = ids.len(), nodes = ?ids, "skipping cyclic component in layered layout");
        layout.excluded.extend(ids);
    }

    debug!(
        dags = parts.dags.len(),
        isolated = parts.isolated.len(),
        excluded = layout.excluded.len(),
        "layered layout complete"
    );
    layout
}

/// Smallest column count whose square holds `count` cells.
fn grid_columns(count: usize) -> usize {
    let mut columns = 0usize;
    while columns * columns < count {
        columns += 1;
    }
    columns.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_columns_is_ceiling_square_root() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
        assert_eq!(grid_columns(10), 4);
    }
}
