//! # Canvas
//!
//! The mutation façade: the one public surface through which nodes, edges,
//! selection, viewport and the editing session change.
//!
//! ## Failure semantics
//!
//! Every operation is total. Referring to an id that does not exist is a
//! silent no-op (logged at `trace`), never an error and never a panic: UI
//! events routinely race with deletes. The only fallible entry point is
//! [`Canvas::with_config`], which validates the configuration.
//!
//! ## Atomicity
//!
//! Mutations take `&mut self` and run to completion, so compound transitions
//! (a delete cascading into edges, selection and the editing session; a
//! workspace switch) are never observed half-done. For multi-threaded hosts
//! see [`crate::shared::SharedCanvas`].

use crate::ancestry;
use crate::clock::{Clock, SystemClock};
use crate::config::CanvasConfig;
use crate::editing::{EditingSession, InputMode};
use crate::graph::Graph;
use crate::layout::{self, Placement};
use crate::primitives::DUPLICATE_ID_INFIX;
use crate::selection::{Selection, SelectionSet};
use crate::{
    CalendarMeta, CanvasError, Edge, EdgeId, LinkPreview, Node, NodeField, NodeId, NodeKind,
    Position, TextField, Timestamp, Viewport, WorkspaceId,
};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A consistent, cheaply cloned view of the canvas.
///
/// Holding a snapshot never blocks or observes later mutations: collections
/// are shared `Arc`s that the canvas replaces rather than edits in place.
#[derive(Debug, Clone)]
pub struct CanvasSnapshot {
    pub workspace_id: Option<WorkspaceId>,
    pub nodes: Arc<Vec<Node>>,
    pub edges: Arc<Vec<Edge>>,
    pub selection: SelectionSet,
    pub viewport: Viewport,
    pub editing_node_id: Option<NodeId>,
    pub nodes_version: u64,
    pub edges_version: u64,
}

// =============================================================================
// CANVAS
// =============================================================================

/// Authoritative state of one canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    workspace_id: Option<WorkspaceId>,
    graph: Graph,
    selection: Selection,
    viewport: Viewport,
    editing: EditingSession,
    config: CanvasConfig,
    clock: Arc<dyn Clock>,
    /// Source of duplicate ids; only ever grows.
    duplicate_seq: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::build(CanvasConfig::default(), Arc::new(SystemClock))
    }
}

impl Canvas {
    /// Create an empty canvas with default configuration and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty canvas with a validated configuration.
    pub fn with_config(config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(SystemClock)))
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn build(config: CanvasConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            workspace_id: None,
            graph: Graph::new(),
            selection: Selection::new(),
            viewport: Viewport::default(),
            editing: EditingSession::new(config.default_input_mode),
            config,
            clock,
            duplicate_seq: 0,
        }
    }

    /// Current time according to the canvas clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn workspace_id(&self) -> Option<&WorkspaceId> {
        self.workspace_id.as_ref()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.graph.contains_node(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn nodes_version(&self) -> u64 {
        self.graph.nodes_version()
    }

    #[must_use]
    pub fn edges_version(&self) -> u64 {
        self.graph.edges_version()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Shared handle to the selected ids. Identity changes only when the
    /// contents do.
    #[must_use]
    pub fn selection(&self) -> SelectionSet {
        self.selection.ids()
    }

    #[must_use]
    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selection.contains(id)
    }

    pub fn editing(&self) -> &EditingSession {
        &self.editing
    }

    pub fn editing_node_id(&self) -> Option<&NodeId> {
        self.editing.editing_node_id()
    }

    pub fn draft_content(&self) -> Option<&str> {
        self.editing.draft_content()
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.editing.input_mode()
    }

    /// Consistent view for renderers and persistence.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            workspace_id: self.workspace_id.clone(),
            nodes: self.graph.nodes_arc(),
            edges: self.graph.edges_arc(),
            selection: self.selection.ids(),
            viewport: self.viewport,
            editing_node_id: self.editing.editing_node_id().cloned(),
            nodes_version: self.graph.nodes_version(),
            edges_version: self.graph.edges_version(),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Transitive ancestors via incoming edges, closest first.
    pub fn upstream_nodes(&self, id: &NodeId) -> Vec<Node> {
        ancestry::upstream_nodes(&self.graph, id)
    }

    /// Ancestors at most `max_depth` hops away.
    pub fn upstream_nodes_within(&self, id: &NodeId, max_depth: usize) -> Vec<Node> {
        ancestry::upstream_nodes_within(&self.graph, id, max_depth)
    }

    /// Ids directly joined to `id` by an edge in either direction.
    pub fn connected_nodes(&self, id: &NodeId) -> Vec<NodeId> {
        ancestry::connected_nodes(&self.graph, id)
    }

    /// The arrangement `arrange_all` would apply, without applying it.
    pub fn layout_preview(&self) -> Vec<Placement> {
        layout::arrange_masonry(self.graph.nodes(), &self.config.layout)
    }

    // =========================================================================
    // NODE MUTATIONS
    // =========================================================================

    /// Append a node. Ids are not checked for uniqueness.
    pub fn add_node(&mut self, node: Node) {
        tracing::debug!(node_id = %node.id, "add_node");
        self.graph.push_node(node);
    }

    /// Replace one field of a node and refresh its `updated_at`.
    pub fn update_field(&mut self, node_id: &NodeId, field: NodeField) {
        let now = self.clock.now();
        let name = field.name();
        let updated = self.graph.update_node(node_id, |node| {
            field.clone().apply(node);
            node.updated_at = now;
        });
        if !updated {
            tracing::trace!(node_id = %node_id, field = name, "update_field: node not found");
        }
    }

    /// Concatenate `chunk` onto a text field. Used for streaming AI output.
    pub fn append_to_field(&mut self, node_id: &NodeId, field: TextField, chunk: &str) {
        let now = self.clock.now();
        let updated = self.graph.update_node(node_id, |node| {
            field.get_mut(node).push_str(chunk);
            node.updated_at = now;
        });
        if !updated {
            tracing::trace!(node_id = %node_id, "append_to_field: node not found");
        }
    }

    pub fn set_kind(&mut self, node_id: &NodeId, kind: NodeKind) {
        self.update_field(node_id, NodeField::Kind(kind));
    }

    pub fn set_position(&mut self, node_id: &NodeId, position: Position) {
        self.update_field(node_id, NodeField::Position(position));
    }

    pub fn set_dimensions(&mut self, node_id: &NodeId, width: Option<f64>, height: Option<f64>) {
        self.update_field(node_id, NodeField::Dimensions { width, height });
    }

    pub fn update_prompt(&mut self, node_id: &NodeId, prompt: impl Into<String>) {
        self.update_field(node_id, NodeField::Prompt(prompt.into()));
    }

    pub fn update_output(&mut self, node_id: &NodeId, output: impl Into<String>) {
        self.update_field(node_id, NodeField::Output(output.into()));
    }

    pub fn set_tags(&mut self, node_id: &NodeId, tags: Vec<String>) {
        self.update_field(node_id, NodeField::Tags(tags));
    }

    pub fn set_color(&mut self, node_id: &NodeId, color: Option<String>) {
        self.update_field(node_id, NodeField::Color(color));
    }

    pub fn set_generating(&mut self, node_id: &NodeId, generating: bool) {
        self.update_field(node_id, NodeField::Generating(generating));
    }

    pub fn set_pinned(&mut self, node_id: &NodeId, pinned: bool) {
        self.update_field(node_id, NodeField::Pinned(pinned));
    }

    pub fn set_collapsed(&mut self, node_id: &NodeId, collapsed: bool) {
        self.update_field(node_id, NodeField::Collapsed(collapsed));
    }

    pub fn set_pool(&mut self, node_id: &NodeId, pool: Option<String>) {
        self.update_field(node_id, NodeField::Pool(pool));
    }

    pub fn set_calendar(&mut self, node_id: &NodeId, calendar: Option<CalendarMeta>) {
        self.update_field(node_id, NodeField::Calendar(calendar));
    }

    pub fn set_link_previews(&mut self, node_id: &NodeId, previews: BTreeMap<String, LinkPreview>) {
        self.update_field(node_id, NodeField::LinkPreviews(previews));
    }

    pub fn set_link_preview(&mut self, node_id: &NodeId, preview: LinkPreview) {
        self.update_field(node_id, NodeField::LinkPreview(preview));
    }

    /// Remove a node together with its incident edges, its selection entry
    /// and, if it is being edited, the editing session.
    ///
    /// Idempotent. Dangling edges that still name `node_id` are removed even
    /// when the node itself is already gone.
    pub fn delete_node(&mut self, node_id: &NodeId) {
        let removed = self.graph.remove_node(node_id);
        let dropped_edges = self.graph.remove_incident_edges(node_id);
        let deselected = self.selection.deselect(node_id);
        let released = self.editing.release(node_id);

        if removed || dropped_edges > 0 {
            tracing::debug!(
                node_id = %node_id,
                dropped_edges,
                deselected,
                released_editor = released,
                "delete_node"
            );
        } else {
            tracing::trace!(node_id = %node_id, "delete_node: node not found");
        }
        self.debug_check_invariants();
    }

    /// Copy a node under a fresh id, offset so it does not sit exactly on
    /// top of anything. Returns `None` if the source does not exist.
    ///
    /// Kind, size and data are copied; edges are not. The copy gets new
    /// timestamps and is never marked as generating.
    pub fn duplicate_node(&mut self, node_id: &NodeId) -> Option<NodeId> {
        let Some(source) = self.graph.node(node_id).cloned() else {
            tracing::trace!(node_id = %node_id, "duplicate_node: node not found");
            return None;
        };

        let new_id = self.next_duplicate_id(node_id);
        let position = self.free_offset_position(source.position);
        let now = self.clock.now();

        let mut copy = source;
        copy.id = new_id.clone();
        copy.position = position;
        copy.created_at = now;
        copy.updated_at = now;
        copy.data.is_generating = false;

        tracing::debug!(source = %node_id, copy = %new_id, "duplicate_node");
        self.graph.push_node(copy);
        Some(new_id)
    }

    fn next_duplicate_id(&mut self, source: &NodeId) -> NodeId {
        loop {
            self.duplicate_seq = self.duplicate_seq.wrapping_add(1);
            let candidate = NodeId(format!("{source}{DUPLICATE_ID_INFIX}{}", self.duplicate_seq));
            if !self.graph.contains_node(&candidate) {
                return candidate;
            }
        }
    }

    /// First `origin + k * duplicate_offset` (k >= 1) not already occupied.
    fn free_offset_position(&self, origin: Position) -> Position {
        let step = self.config.duplicate_offset;
        // One of the first n + 1 candidates is free unless float precision
        // collapses them; then the first step is used.
        for k in 1..=self.graph.node_count().saturating_add(1) {
            let candidate = origin.offset_by(step, k as f64);
            if !self.graph.nodes().iter().any(|n| n.position == candidate) {
                return candidate;
            }
        }
        origin.offset_by(step, 1.0)
    }

    /// Bulk replace of the node collection (hydration).
    ///
    /// Selection entries and an editing session that refer to nodes absent
    /// from `nodes` are dropped.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        tracing::debug!(count = nodes.len(), "set_nodes");
        self.graph.replace_nodes(nodes);
        self.prune_stale_references();
        self.debug_check_invariants();
    }

    fn prune_stale_references(&mut self) {
        let graph = &self.graph;
        self.selection.retain(|id| graph.contains_node(id));
        let stale_editor = self
            .editing
            .editing_node_id()
            .is_some_and(|id| !graph.contains_node(id));
        if stale_editor {
            self.editing.stop();
        }
    }

    // =========================================================================
    // EDGE MUTATIONS
    // =========================================================================

    /// Append an edge. Endpoints are not checked.
    pub fn add_edge(&mut self, edge: Edge) {
        tracing::debug!(
            edge_id = %edge.id,
            source = %edge.source,
            target = %edge.target,
            "add_edge"
        );
        self.graph.push_edge(edge);
    }

    pub fn delete_edge(&mut self, edge_id: &EdgeId) {
        if !self.graph.remove_edge(edge_id) {
            tracing::trace!(edge_id = %edge_id, "delete_edge: edge not found");
        }
    }

    /// Bulk replace of the edge collection (hydration).
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        tracing::debug!(count = edges.len(), "set_edges");
        self.graph.replace_edges(edges);
    }

    // =========================================================================
    // CANVAS-WIDE
    // =========================================================================

    /// Reset nodes, edges, selection, viewport and editing session.
    /// The workspace id is kept.
    pub fn clear_canvas(&mut self) {
        tracing::debug!("clear_canvas");
        self.graph.clear();
        self.selection.clear();
        self.viewport = Viewport::default();
        self.editing.stop();
    }

    /// Clear, then load another workspace's collections, in one call.
    pub fn switch_workspace(
        &mut self,
        workspace_id: WorkspaceId,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) {
        tracing::info!(
            workspace_id = %workspace_id,
            nodes = nodes.len(),
            edges = edges.len(),
            "switch_workspace"
        );
        self.clear_canvas();
        self.workspace_id = Some(workspace_id);
        self.graph.replace_nodes(nodes);
        self.graph.replace_edges(edges);
        self.debug_check_invariants();
    }

    pub fn set_workspace_id(&mut self, workspace_id: Option<WorkspaceId>) {
        self.workspace_id = workspace_id;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn select_node(&mut self, node_id: &NodeId) {
        if !self.graph.contains_node(node_id) {
            tracing::trace!(node_id = %node_id, "select_node: node not found");
            return;
        }
        self.selection.select(node_id.clone());
    }

    pub fn deselect_node(&mut self, node_id: &NodeId) {
        self.selection.deselect(node_id);
    }

    /// Empty the selection and return the resulting set. Clearing an empty
    /// selection returns the very same `Arc` as before.
    pub fn clear_selection(&mut self) -> SelectionSet {
        self.selection.clear();
        self.selection.ids()
    }

    /// Replace the selection; ids of missing nodes are ignored.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let graph = &self.graph;
        self.selection
            .replace(ids.into_iter().filter(|id| graph.contains_node(id)));
    }

    // =========================================================================
    // EDITING SESSION
    // =========================================================================

    /// Begin editing `node_id`, discarding any other session and its draft.
    pub fn start_editing(&mut self, node_id: &NodeId) {
        if !self.graph.contains_node(node_id) {
            tracing::trace!(node_id = %node_id, "start_editing: node not found");
            return;
        }
        let previous = self.editing.editing_node_id().cloned();
        if let Some(discarded) = self.editing.start(node_id.clone()) {
            tracing::debug!(
                previous = ?previous,
                discarded_len = discarded.len(),
                "start_editing: unsaved draft discarded"
            );
        }
        self.debug_check_invariants();
    }

    /// Store unsaved text for the edited node. Ignored while idle.
    pub fn update_draft(&mut self, content: impl Into<String>) {
        if !self.editing.update_draft(content) {
            tracing::trace!("update_draft: no active editing session");
        }
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.editing.set_input_mode(mode);
    }

    pub fn toggle_input_mode(&mut self) {
        self.editing.toggle_input_mode();
    }

    /// Leave the editing session. An uncommitted draft is lost.
    pub fn stop_editing(&mut self) {
        self.editing.stop();
    }

    /// Write the draft into the edited node: `Note` mode saves it as the
    /// node's output, `Ai` mode as its prompt. The session stays open.
    ///
    /// Returns `false` when idle or when there is no draft yet.
    pub fn commit_draft(&mut self) -> bool {
        let Some(node_id) = self.editing.editing_node_id().cloned() else {
            return false;
        };
        let Some(draft) = self.editing.draft_content().map(str::to_owned) else {
            return false;
        };
        let field = match self.editing.input_mode() {
            InputMode::Note => NodeField::Output(draft),
            InputMode::Ai => NodeField::Prompt(draft),
        };
        self.update_field(&node_id, field);
        true
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    /// Apply the masonry layout to every node. Returns how many moved.
    pub fn arrange_all(&mut self) -> usize {
        let placements = layout::arrange_indexed(self.graph.nodes(), &self.config.layout);
        self.apply_placements(placements)
    }

    /// Re-run the layout after `node_id` changed size. No-op if it is gone.
    pub fn arrange_after_resize(&mut self, node_id: &NodeId) -> usize {
        if !self.graph.contains_node(node_id) {
            tracing::trace!(node_id = %node_id, "arrange_after_resize: node not found");
            return 0;
        }
        self.arrange_all()
    }

    fn apply_placements(&mut self, placements: Vec<(usize, Placement)>) -> usize {
        let nodes = self.graph.nodes();
        let mut moves: Vec<Option<Position>> = vec![None; nodes.len()];
        let mut pending = 0usize;
        for (index, placement) in placements {
            if nodes.get(index).is_some_and(|n| n.position != placement.position) {
                moves[index] = Some(placement.position);
                pending += 1;
            }
        }
        if pending == 0 {
            return 0;
        }

        let now = self.clock.now();
        let moved = self.graph.update_many(|index, node| match moves.get(index) {
            Some(&Some(position)) => {
                node.position = position;
                node.updated_at = now;
                true
            }
            _ => false,
        });
        tracing::debug!(moved, "arrange: positions applied");
        moved
    }

    // =========================================================================
    // INVARIANTS
    // =========================================================================

    fn debug_check_invariants(&self) {
        debug_assert!(
            self.editing
                .editing_node_id()
                .is_none_or(|id| self.graph.contains_node(id)),
            "editing session refers to a node that does not exist"
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
