#![allow(dead_code)]

use taskgraph::{DirectedGraph, NodeAttributes};

/// Task graph from `(id, story_points)` pairs and `(task, depends_on)` edges.
pub fn task_graph(tasks: &[(&str, i64)], depends_on: &[(&str, &str)]) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for &(id, points) in tasks {
        graph.add_node(id, NodeAttributes::new().with_story_points(points));
    }
    for &(task, dependency) in depends_on {
        graph.add_edge(task, dependency);
    }
    graph
}

/// Employee graph from `(id, seniority)` pairs; `None` leaves the attribute unset.
pub fn hierarchy(employees: &[(&str, Option<&str>)]) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for &(id, seniority) in employees {
        let attrs = match seniority {
            Some(label) => NodeAttributes::new().with_seniority(label),
            None => NodeAttributes::new(),
        };
        graph.add_node(id, attrs);
    }
    graph
}
