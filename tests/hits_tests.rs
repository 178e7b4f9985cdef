use serde_json::json;
use taskgraph::{DirectedGraph, HitsConfig, NodeAttributes, hits_from_graph, hits_table};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

fn interactions(people: &[&str], links: &[(&str, &str)]) -> DirectedGraph {
    let mut graph = DirectedGraph::new();
    for &id in people {
        graph.add_node(id, NodeAttributes::new());
    }
    for &(from, to) in links {
        graph.add_edge(from, to);
    }
    graph
}

fn star() -> DirectedGraph {
    interactions(
        &["employee/1", "employee/2", "employee/3", "employee/4", "employee/0"],
        &[
            ("employee/0", "employee/1"),
            ("employee/0", "employee/2"),
            ("employee/0", "employee/3"),
            ("employee/0", "employee/4"),
        ],
    )
}

#[test]
fn star_centre_is_the_top_hub() {
    let analysis = hits_from_graph(&star(), &HitsConfig::default()).unwrap();
    assert!(analysis.converged());

    let top = &analysis.entries()[0];
    assert_eq!(top.node_id, "employee/0");
    assert_eq!(top.emp_id, "0");
    assert!(close(top.hub_score, 1.0));
    assert!(close(top.authority_score, 0.0));

    for leaf in ["employee/1", "employee/2", "employee/3", "employee/4"] {
        let entry = analysis.entry(leaf).unwrap();
        assert!(close(entry.hub_score, 0.0));
        assert!(close(entry.authority_score, 0.25));
    }

    let hub_total: f64 = analysis.entries().iter().map(|e| e.hub_score).sum();
    let authority_total: f64 = analysis.entries().iter().map(|e| e.authority_score).sum();
    assert!(close(hub_total, 1.0));
    assert!(close(authority_total, 1.0));
}

#[test]
fn equal_hubs_keep_insertion_order() {
    // A -> B -> C: A and B are equal hubs, B and C equal authorities
    let graph = interactions(
        &["employee/A", "employee/B", "employee/C"],
        &[("employee/A", "employee/B"), ("employee/B", "employee/C")],
    );
    let analysis = hits_from_graph(&graph, &HitsConfig::default()).unwrap();

    let order: Vec<&str> = analysis.entries().iter().map(|e| e.emp_id.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert!(close(analysis.entries()[0].hub_score, 0.5));
    assert!(close(analysis.entries()[1].hub_score, 0.5));

    let authorities: Vec<&str> = analysis
        .top_authorities(2)
        .iter()
        .map(|e| e.emp_id.as_str())
        .collect();
    assert_eq!(authorities, vec!["B", "C"]);
    assert_eq!(analysis.top_hubs(1)[0].emp_id, "A");
}

#[test]
fn table_from_documents_has_ranked_columns() {
    let graph = DirectedGraph::from_json_str(
        r#"{
            "nodes": [
                {"_id": "employee/7", "FirstName": "Ada"},
                {"_id": "employee/8", "FirstName": "Lin"},
                {"_id": "employee/9", "FirstName": "Sam"}
            ],
            "edges": [
                {"_from": "employee/9", "_to": "employee/7"},
                {"_from": "employee/9", "_to": "employee/8"},
                {"_from": "employee/8", "_to": "employee/7"}
            ]
        }"#,
    )
    .unwrap();
    let df = hits_table(&graph).unwrap();

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["EmpID", "Hub_Score", "Authority_Score"]);
    assert_eq!(df.height(), 3);

    let first = df.column("EmpID").unwrap().str().unwrap().get(0).unwrap();
    assert_eq!(first, "9");
    let hubs: Vec<f64> = df
        .column("Hub_Score")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(hubs.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn heavier_links_carry_more_authority() {
    let mut graph = interactions(&["employee/A", "employee/B", "employee/C"], &[]);
    let mut heavy = serde_json::Map::new();
    heavy.insert("weight".to_string(), json!(3));
    graph.add_edge_with("employee/A", "employee/B", heavy);
    graph.add_edge("employee/A", "employee/C");

    let analysis = hits_from_graph(&graph, &HitsConfig::default()).unwrap();
    assert!(close(analysis.entry("employee/B").unwrap().authority_score, 0.75));
    assert!(close(analysis.entry("employee/C").unwrap().authority_score, 0.25));
}

#[test]
fn iteration_cap_returns_the_last_iterate() {
    let config = HitsConfig {
        max_iterations: 1,
        ..HitsConfig::default()
    };
    let analysis = hits_from_graph(&star(), &config).unwrap();
    assert!(!analysis.converged());
    assert_eq!(analysis.iterations(), 1);
    assert_eq!(analysis.entries()[0].node_id, "employee/0");
}

#[test]
fn graph_without_links_scores_zero() {
    let graph = interactions(&["employee/1", "employee/2"], &[]);
    let analysis = hits_from_graph(&graph, &HitsConfig::default()).unwrap();
    assert!(analysis.converged());
    for entry in analysis.entries() {
        assert_eq!(entry.hub_score, 0.0);
        assert_eq!(entry.authority_score, 0.0);
    }
    let order: Vec<&str> = analysis.entries().iter().map(|e| e.emp_id.as_str()).collect();
    assert_eq!(order, vec!["1", "2"]);
}

#[test]
fn empty_graph_gives_empty_frame() {
    let analysis = hits_from_graph(&DirectedGraph::new(), &HitsConfig::default()).unwrap();
    assert!(analysis.is_empty());
    assert_eq!(analysis.iterations(), 0);

    let df = hits_table(&DirectedGraph::new()).unwrap();
    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), 3);
}

#[test]
fn repeated_runs_give_identical_scores() {
    let first = hits_from_graph(&star(), &HitsConfig::default()).unwrap();
    let second = hits_from_graph(&star(), &HitsConfig::default()).unwrap();
    assert_eq!(first, second);
}
