use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Weakly-connected components, ordered by their smallest node index, with
/// members in ascending index order.
pub fn weakly_connected_components<N, E>(graph: &DiGraph<N, E>) -> Vec<Vec<NodeIndex>> {
    let mut sets = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut components: IndexMap<usize, Vec<NodeIndex>> = IndexMap::new();
    for ix in graph.node_indices() {
        components
            .entry(sets.find(ix.index()))
            .or_default()
            .push(ix);
    }
    components.into_values().collect()
}

/// Peel `members` into topological generations (Kahn's algorithm, one layer
/// per round). Only edges between members count.
///
/// Generation 0 holds the members with no incoming member edge; each later
/// generation holds the nodes whose last remaining in-edge came from the
/// previous one. Each generation is sorted by node index.
///
/// Returns `Err(node)` with a member that lies on a cycle when peeling stalls.
pub fn topological_generations<N, E>(
    graph: &DiGraph<N, E>,
    members: &[NodeIndex],
) -> Result<Vec<Vec<NodeIndex>>, NodeIndex> {
    let mut in_degree: HashMap<NodeIndex, usize> = members.iter().map(|&ix| (ix, 0)).collect();
    for &ix in members {
        for succ in graph.neighbors_directed(ix, Direction::Outgoing) {
            if let Some(deg) = in_degree.get_mut(&succ) {
                *deg += 1;
            }
        }
    }

    let mut current: Vec<NodeIndex> = members
        .iter()
        .copied()
        .filter(|ix| in_degree[ix] == 0)
        .collect();
    current.sort_unstable();

    let mut generations = Vec::new();
    let mut placed = 0usize;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &ix in &current {
            for succ in graph.neighbors_directed(ix, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&succ) {
                    *deg -= 1;
                    if *deg == 0 {
                        next.push(succ);
                    }
                }
            }
        }
        next.sort_unstable();
        placed += current.len();
        generations.push(current);
        current = next;
    }

    if placed < members.len() {
        return Err(cycle_member(graph, &in_degree).unwrap_or(members[0]));
    }
    Ok(generations)
}

/// After Kahn's algorithm stalls, every unplaced member still has an unplaced
/// parent. Walking parents from the smallest unplaced member must revisit a
/// node, and the first revisited node lies on a cycle.
fn cycle_member<N, E>(
    graph: &DiGraph<N, E>,
    in_degree: &HashMap<NodeIndex, usize>,
) -> Option<NodeIndex> {
    let unplaced = |ix: &NodeIndex| in_degree.get(ix).is_some_and(|&deg| deg > 0);

    let mut current = in_degree.keys().copied().filter(unplaced).min()?;
    let mut seen = HashSet::new();
    while seen.insert(current) {
        match graph
            .neighbors_directed(current, Direction::Incoming)
            .filter(unplaced)
            .min()
        {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Some(current)
}
