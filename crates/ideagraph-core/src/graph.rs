//! # Graph Repository
//!
//! In-memory node and edge collections for one canvas.
//!
//! Collections live behind `Arc<Vec<_>>` and are only changed through
//! `Arc::make_mut`: a snapshot handed to a reader is never modified in place,
//! and every change bumps a version counter that derived caches key on.
//!
//! The repository is deliberately dumb. It enforces no uniqueness and no
//! referential integrity between edges and nodes; cross-cutting rules (delete
//! cascades into selection and the editing session) belong to
//! [`crate::canvas::Canvas`].

use crate::{Edge, EdgeId, Node, NodeId};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

// =============================================================================
// NODE INDEX
// =============================================================================

/// Lazily built id -> position map over the node collection.
///
/// When two nodes share an id the later one wins, matching what a map built
/// by iterating the collection in order would contain.
#[derive(Debug, Clone)]
struct NodeIndex {
    version: u64,
    positions: BTreeMap<NodeId, usize>,
}

impl NodeIndex {
    fn build(nodes: &[Node], version: u64) -> Self {
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        Self { version, positions }
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// Node and edge storage with copy-on-write collections.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Arc<Vec<Node>>,
    edges: Arc<Vec<Edge>>,

    /// Bumped on every change to `nodes`.
    nodes_version: u64,

    /// Bumped on every change to `edges`.
    edges_version: u64,

    /// Rebuilt on first lookup after `nodes_version` moves.
    node_index: OnceLock<NodeIndex>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from existing collections.
    #[must_use]
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes: Arc::new(nodes),
            edges: Arc::new(edges),
            ..Self::default()
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Shared handle to the node collection, for snapshots.
    #[must_use]
    pub fn nodes_arc(&self) -> Arc<Vec<Node>> {
        Arc::clone(&self.nodes)
    }

    /// Shared handle to the edge collection, for snapshots.
    #[must_use]
    pub fn edges_arc(&self) -> Arc<Vec<Edge>> {
        Arc::clone(&self.edges)
    }

    #[must_use]
    pub fn nodes_version(&self) -> u64 {
        self.nodes_version
    }

    #[must_use]
    pub fn edges_version(&self) -> u64 {
        self.edges_version
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id through the index cache.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        let index = self.index();
        index.positions.get(id).and_then(|&i| self.nodes.get(i))
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index().positions.contains_key(id)
    }

    #[must_use]
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|e| &e.id == id)
    }

    /// Edges whose source or target is `id`, in collection order.
    pub fn incident_edges<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    fn index(&self) -> &NodeIndex {
        let index = self
            .node_index
            .get_or_init(|| NodeIndex::build(&self.nodes, self.nodes_version));
        debug_assert_eq!(index.version, self.nodes_version, "stale node index");
        index
    }

    // =========================================================================
    // NODE MUTATIONS
    // =========================================================================

    fn nodes_changed(&mut self) {
        self.nodes_version = self.nodes_version.wrapping_add(1);
        self.node_index = OnceLock::new();
    }

    fn edges_changed(&mut self) {
        self.edges_version = self.edges_version.wrapping_add(1);
    }

    pub fn push_node(&mut self, node: Node) {
        Arc::make_mut(&mut self.nodes).push(node);
        self.nodes_changed();
    }

    /// Apply `f` to every node with this id. Returns `false` if none exist,
    /// in which case nothing (not even the version) changes.
    pub fn update_node(&mut self, id: &NodeId, mut f: impl FnMut(&mut Node)) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        for node in Arc::make_mut(&mut self.nodes)
            .iter_mut()
            .filter(|n| &n.id == id)
        {
            f(node);
        }
        self.nodes_changed();
        true
    }

    /// Apply `f` to every node along with its index in the collection; `f`
    /// reports whether it changed the node. Returns the number of changed
    /// nodes.
    ///
    /// Callers should only invoke this when a change is expected: the
    /// collection is made unique before `f` runs.
    pub fn update_many(&mut self, mut f: impl FnMut(usize, &mut Node) -> bool) -> usize {
        let mut changed = 0usize;
        for (index, node) in Arc::make_mut(&mut self.nodes).iter_mut().enumerate() {
            if f(index, node) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.nodes_changed();
        }
        changed
    }

    /// Remove every node with this id. Edges are left alone.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        Arc::make_mut(&mut self.nodes).retain(|n| &n.id != id);
        self.nodes_changed();
        true
    }

    pub fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = Arc::new(nodes);
        self.nodes_changed();
    }

    // =========================================================================
    // EDGE MUTATIONS
    // =========================================================================

    pub fn push_edge(&mut self, edge: Edge) {
        Arc::make_mut(&mut self.edges).push(edge);
        self.edges_changed();
    }

    /// Remove every edge with this id.
    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        if !self.contains_edge(id) {
            return false;
        }
        Arc::make_mut(&mut self.edges).retain(|e| &e.id != id);
        self.edges_changed();
        true
    }

    /// Remove every edge touching `node`. Returns how many were dropped.
    pub fn remove_incident_edges(&mut self, node: &NodeId) -> usize {
        let before = self.edges.len();
        if !self.edges.iter().any(|e| e.touches(node)) {
            return 0;
        }
        Arc::make_mut(&mut self.edges).retain(|e| !e.touches(node));
        self.edges_changed();
        before - self.edges.len()
    }

    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.edges = Arc::new(edges);
        self.edges_changed();
    }

    /// Drop all nodes and edges.
    pub fn clear(&mut self) {
        self.replace_nodes(Vec::new());
        self.replace_edges(Vec::new());
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Timestamp};

    fn node(id: &str) -> Node {
        Node::new(id, "ws", Position::default(), Timestamp(0))
    }

    fn edge(id: &str, from: &str, to: &str) -> Edge {
        Edge::new(id, "ws", from, to)
    }

    #[test]
    fn push_and_lookup_node() {
        let mut graph = Graph::new();
        graph.push_node(node("a"));

        assert!(graph.contains_node(&NodeId::from("a")));
        assert_eq!(
            graph.node(&NodeId::from("a")).map(|n| n.id.as_str()),
            Some("a")
        );
        assert!(graph.node(&NodeId::from("missing")).is_none());
    }

    #[test]
    fn index_is_rebuilt_after_mutation() {
        let mut graph = Graph::new();
        graph.push_node(node("a"));
        assert!(graph.node(&NodeId::from("a")).is_some());

        graph.push_node(node("b"));
        assert!(graph.node(&NodeId::from("b")).is_some());

        graph.remove_node(&NodeId::from("a"));
        assert!(graph.node(&NodeId::from("a")).is_none());
        assert_eq!(
            graph.node(&NodeId::from("b")).map(|n| n.id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn snapshot_is_not_mutated_by_later_writes() {
        let mut graph = Graph::new();
        graph.push_node(node("a"));
        let snapshot = graph.nodes_arc();

        graph.push_node(node("b"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(graph.node_count(), 2);
        assert!(!Arc::ptr_eq(&snapshot, &graph.nodes_arc()));
    }

    #[test]
    fn missing_id_leaves_version_untouched() {
        let mut graph = Graph::new();
        graph.push_node(node("a"));
        let version = graph.nodes_version();

        assert!(!graph.update_node(&NodeId::from("zzz"), |n| n.data.pinned = true));
        assert!(!graph.remove_node(&NodeId::from("zzz")));
        assert_eq!(graph.nodes_version(), version);
    }

    #[test]
    fn update_touches_all_nodes_sharing_an_id() {
        let mut graph = Graph::new();
        graph.push_node(node("dup"));
        graph.push_node(node("dup"));

        graph.update_node(&NodeId::from("dup"), |n| n.data.pinned = true);

        assert!(graph.nodes().iter().all(|n| n.data.pinned));
    }

    #[test]
    fn remove_incident_edges_counts_both_directions() {
        let mut graph = Graph::from_parts(
            vec![node("a"), node("b"), node("c")],
            vec![edge("e1", "a", "b"), edge("e2", "c", "a"), edge("e3", "b", "c")],
        );

        let removed = graph.remove_incident_edges(&NodeId::from("a"));

        assert_eq!(removed, 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].id, EdgeId::from("e3"));
    }

    #[test]
    fn remove_incident_edges_without_match_keeps_version() {
        let mut graph = Graph::from_parts(vec![node("a")], vec![edge("e1", "b", "c")]);
        let version = graph.edges_version();

        assert_eq!(graph.remove_incident_edges(&NodeId::from("a")), 0);
        assert_eq!(graph.edges_version(), version);
    }

    #[test]
    fn edges_may_reference_missing_nodes() {
        let mut graph = Graph::new();
        graph.push_edge(edge("e1", "ghost", "phantom"));

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(&EdgeId::from("e1")));
        assert!(graph.remove_edge(&EdgeId::from("e1")));
        assert!(!graph.remove_edge(&EdgeId::from("e1")));
    }

    #[test]
    fn clear_bumps_both_versions() {
        let mut graph = Graph::from_parts(vec![node("a")], vec![edge("e1", "a", "a")]);
        let (nv, ev) = (graph.nodes_version(), graph.edges_version());

        graph.clear();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.nodes_version() > nv);
        assert!(graph.edges_version() > ev);
    }
}
