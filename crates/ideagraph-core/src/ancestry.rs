//! # Ancestry Queries
//!
//! Read-only connectivity queries over a [`Graph`].
//!
//! Upstream nodes are everything that feeds into a node through incoming
//! edges, transitively. AI context assembly calls this on every generation
//! request, so the traversal builds a reverse adjacency once and then runs a
//! single BFS: each edge and each node is visited at most once.

use crate::graph::Graph;
use crate::primitives::MAX_TRAVERSAL_DEPTH;
use crate::{Node, NodeId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// target -> sources, each list in edge order.
fn reverse_adjacency(graph: &Graph) -> BTreeMap<&NodeId, Vec<&NodeId>> {
    let mut parents: BTreeMap<&NodeId, Vec<&NodeId>> = BTreeMap::new();
    for edge in graph.edges() {
        parents.entry(&edge.target).or_default().push(&edge.source);
    }
    parents
}

/// Breadth-first walk over incoming edges.
///
/// The start node is seeded as visited, so it can never be reported, even
/// when a cycle leads back to it. Sources that are not nodes of the graph
/// (dangling edges) are skipped and not walked through.
fn walk_upstream<'g>(graph: &'g Graph, start: &'g NodeId, max_depth: usize) -> Vec<&'g NodeId> {
    let parents = reverse_adjacency(graph);

    let mut visited: BTreeSet<&NodeId> = BTreeSet::new();
    let mut queue: VecDeque<(&NodeId, usize)> = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let Some(sources) = parents.get(current) else {
            continue;
        };
        for &source in sources {
            if !graph.contains_node(source) || !visited.insert(source) {
                continue;
            }
            order.push(source);
            queue.push_back((source, depth.saturating_add(1)));
        }
    }

    order
}

/// Ids of all upstream nodes, closest first.
pub fn upstream_ids(graph: &Graph, node_id: &NodeId) -> Vec<NodeId> {
    walk_upstream(graph, node_id, usize::MAX)
        .into_iter()
        .cloned()
        .collect()
}

/// All upstream nodes, closest first, each exactly once.
///
/// Chain `A -> B -> C` yields `[B, A]` for `C`. The node itself and nodes not
/// connected to it never appear. Terminates on cyclic graphs.
pub fn upstream_nodes(graph: &Graph, node_id: &NodeId) -> Vec<Node> {
    collect_nodes(graph, walk_upstream(graph, node_id, usize::MAX))
}

/// Upstream nodes at most `max_depth` hops away.
///
/// `max_depth` is clamped to [`MAX_TRAVERSAL_DEPTH`]; depth 0 returns nothing.
pub fn upstream_nodes_within(graph: &Graph, node_id: &NodeId, max_depth: usize) -> Vec<Node> {
    let depth = max_depth.min(MAX_TRAVERSAL_DEPTH);
    collect_nodes(graph, walk_upstream(graph, node_id, depth))
}

fn collect_nodes(graph: &Graph, ids: Vec<&NodeId>) -> Vec<Node> {
    ids.into_iter()
        .filter_map(|id| graph.node(id).cloned())
        .collect()
}

/// Ids of nodes sharing an edge with `node_id`, in either direction.
///
/// First-seen order over the edge list, no duplicates, never `node_id`
/// itself (self-loops are ignored). Endpoints are reported even if the edge
/// dangles.
pub fn connected_nodes(graph: &Graph, node_id: &NodeId) -> Vec<NodeId> {
    let mut seen: BTreeSet<&NodeId> = BTreeSet::new();
    let mut out = Vec::new();

    for edge in graph.incident_edges(node_id) {
        let other = if &edge.source == node_id {
            &edge.target
        } else {
            &edge.source
        };
        if other != node_id && seen.insert(other) {
            out.push(other.clone());
        }
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================
