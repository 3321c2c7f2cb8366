//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Repository integrity
//! - T1: Ancestry traversal
//! - T2: Delete cascade
//! - T3: Selection and editing session
//! - T4: Masonry layout

use ideagraph_core::{
    Canvas, Edge, LayoutConfig, ManualClock, Node, NodeId, Position, Timestamp, arrange_masonry,
};
use std::sync::Arc;

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

/// Canvas holding `nodes` (created one ms apart) and `edges` given as
/// `(source, target)` pairs.
fn canvas_with(nodes: &[&str], edges: &[(&str, &str)]) -> Canvas {
    let clock = Arc::new(ManualClock::new(Timestamp(0)));
    let mut canvas = Canvas::new().with_clock(clock.clone());
    for name in nodes {
        canvas.add_node(Node::new(*name, "ws", Position::default(), canvas.now()));
        clock.advance(1);
    }
    for (i, (from, to)) in edges.iter().enumerate() {
        canvas.add_edge(Edge::new(format!("e{i}"), "ws", *from, *to));
    }
    canvas
}

fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

// =============================================================================
// TIER T0: REPOSITORY INTEGRITY
// =============================================================================

mod t0_repository_integrity {
    use super::*;

    /// T0.1: Lookups see nodes added after an earlier lookup.
    #[test]
    fn lookup_index_follows_mutations() {
        let mut canvas = canvas_with(&["a"], &[]);
        assert!(canvas.node(&id("a")).is_some());

        canvas.add_node(Node::new("b", "ws", Position::default(), Timestamp(9)));
        assert!(canvas.node(&id("b")).is_some());

        canvas.delete_node(&id("a"));
        assert!(canvas.node(&id("a")).is_none());
    }

    /// T0.2: Every mutation bumps the version of the collection it touched.
    #[test]
    fn versions_track_mutations() {
        let mut canvas = canvas_with(&["a", "b"], &[]);
        let (nv, ev) = (canvas.nodes_version(), canvas.edges_version());

        canvas.add_edge(Edge::new("e", "ws", "a", "b"));
        assert_eq!(canvas.nodes_version(), nv);
        assert!(canvas.edges_version() > ev);

        canvas.update_output(&id("a"), "text");
        assert!(canvas.nodes_version() > nv);
    }

    /// T0.3: Missing ids never fail and never change anything.
    #[test]
    fn missing_ids_are_noops() {
        let mut canvas = canvas_with(&["a"], &[("a", "a")]);
        let before = canvas.snapshot();

        canvas.update_prompt(&id("ghost"), "x");
        canvas.set_dimensions(&id("ghost"), Some(1.0), Some(1.0));
        canvas.select_node(&id("ghost"));
        canvas.start_editing(&id("ghost"));
        assert!(canvas.duplicate_node(&id("ghost")).is_none());

        let after = canvas.snapshot();
        assert!(Arc::ptr_eq(&before.nodes, &after.nodes));
        assert!(Arc::ptr_eq(&before.edges, &after.edges));
        assert!(Arc::ptr_eq(&before.selection, &after.selection));
        assert!(after.editing_node_id.is_none());
    }

    /// T0.4: Workspace switch replaces the collections in one call.
    #[test]
    fn workspace_switch_is_one_step() {
        let mut canvas = canvas_with(&["old"], &[]);
        canvas.select_node(&id("old"));
        canvas.start_editing(&id("old"));

        canvas.switch_workspace(
            "other".into(),
            vec![Node::new("fresh", "other", Position::default(), Timestamp(0))],
            Vec::new(),
        );

        let snap = canvas.snapshot();
        assert_eq!(names(&snap.nodes), vec!["fresh"]);
        assert!(snap.selection.is_empty());
        assert!(snap.editing_node_id.is_none());
    }
}

// =============================================================================
// TIER T1: ANCESTRY TRAVERSAL
// =============================================================================

mod t1_ancestry {
    use super::*;

    /// T1.1: Chain A -> B -> C yields [B, A] for C.
    #[test]
    fn chain_is_closest_first() {
        let canvas = canvas_with(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);

        assert_eq!(names(&canvas.upstream_nodes(&id("C"))), vec!["B", "A"]);
    }

    /// T1.2: Diamond A -> C, B -> C lists both parents once.
    #[test]
    fn diamond_lists_each_parent_once() {
        let canvas = canvas_with(&["A", "B", "C"], &[("A", "C"), ("B", "C")]);

        let found = canvas.upstream_nodes(&id("C"));
        let mut up = names(&found);
        up.sort_unstable();
        assert_eq!(up, vec!["A", "B"]);
    }

    /// T1.3: A cycle through the start node terminates and excludes it.
    #[test]
    fn cycle_terminates_without_self() {
        let canvas = canvas_with(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let up = canvas.upstream_nodes(&id("C"));
        let mut got = names(&up);
        got.sort_unstable();
        assert_eq!(got, vec!["A", "B"]);
    }

    /// T1.4: Disconnected nodes never appear.
    #[test]
    fn cities_scenario_excludes_isolated_node() {
        let canvas = canvas_with(
            &["NY", "Washington", "Node4", "London"],
            &[("NY", "Washington"), ("Washington", "Node4")],
        );

        assert_eq!(
            names(&canvas.upstream_nodes(&id("Node4"))),
            vec!["Washington", "NY"]
        );
    }

    /// T1.5: Depth-bounded traversal stops at the bound.
    #[test]
    fn bounded_depth() {
        let canvas = canvas_with(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "D")],
        );

        assert_eq!(names(&canvas.upstream_nodes_within(&id("D"), 2)), vec!["C", "B"]);
        assert!(canvas.upstream_nodes_within(&id("D"), 0).is_empty());
    }

    /// T1.6: Unknown start node yields nothing.
    #[test]
    fn unknown_start_is_empty() {
        let canvas = canvas_with(&["A"], &[]);
        assert!(canvas.upstream_nodes(&id("ghost")).is_empty());
    }
}

// =============================================================================
// TIER T2: DELETE CASCADE
// =============================================================================

mod t2_delete_cascade {
    use super::*;

    /// T2.1: After delete no edge references the node, in either direction.
    #[test]
    fn no_edge_survives() {
        let mut canvas = canvas_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);

        canvas.delete_node(&id("b"));

        assert!(canvas.edges().iter().all(|e| !e.touches(&id("b"))));
        assert_eq!(canvas.edge_count(), 1);
        assert_eq!(canvas.connected_nodes(&id("a")), vec![id("c")]);
    }

    /// T2.2: Deleting twice equals deleting once.
    #[test]
    fn idempotent() {
        let mut canvas = canvas_with(&["a", "b"], &[("a", "b")]);
        canvas.select_node(&id("a"));

        canvas.delete_node(&id("a"));
        let once = canvas.snapshot();
        canvas.delete_node(&id("a"));
        let twice = canvas.snapshot();

        assert_eq!(once.nodes, twice.nodes);
        assert_eq!(once.edges, twice.edges);
        assert_eq!(once.selection, twice.selection);
        assert_eq!(once.nodes_version, twice.nodes_version);
    }

    /// T2.3: Deleting the edited node ends the editing session.
    #[test]
    fn edited_node_releases_editor() {
        let mut canvas = canvas_with(&["a"], &[]);
        canvas.start_editing(&id("a"));
        canvas.update_draft("draft");
        canvas.select_node(&id("a"));

        canvas.delete_node(&id("a"));

        assert!(canvas.editing_node_id().is_none());
        assert!(canvas.draft_content().is_none());
        assert!(!canvas.is_selected(&id("a")));
    }
}

// =============================================================================
// TIER T3: SELECTION AND EDITING SESSION
// =============================================================================

mod t3_selection_editing {
    use super::*;
    use ideagraph_core::InputMode;

    /// T3.1: Clearing an empty selection returns the identical set.
    #[test]
    fn clear_empty_selection_keeps_identity() {
        let mut canvas = canvas_with(&["a"], &[]);
        let before = canvas.selection();

        let after = canvas.clear_selection();

        assert!(Arc::ptr_eq(&before, &after));
    }

    /// T3.2: Selecting then clearing returns to the shared empty set.
    #[test]
    fn cleared_selection_is_shared_empty() {
        let mut canvas = canvas_with(&["a"], &[]);
        let pristine = Canvas::new().selection();
        canvas.select_node(&id("a"));

        let cleared = canvas.clear_selection();

        assert!(Arc::ptr_eq(&pristine, &cleared));
    }

    /// T3.3: Starting to edit B while editing A discards A's draft.
    #[test]
    fn editing_switch_resets_session() {
        let mut canvas = canvas_with(&["A", "B"], &[]);
        canvas.start_editing(&id("A"));
        canvas.update_draft("unsaved");
        canvas.set_input_mode(InputMode::Ai);

        canvas.start_editing(&id("B"));

        assert_eq!(canvas.editing_node_id(), Some(&id("B")));
        assert!(canvas.draft_content().is_none());
        assert_eq!(canvas.input_mode(), InputMode::Note);
        let a = canvas.node(&id("A")).expect("A");
        assert!(a.data.output.is_empty() && a.data.prompt.is_empty());
    }

    /// T3.4: Drafts never touch node data until committed.
    #[test]
    fn draft_is_not_persisted_until_commit() {
        let mut canvas = canvas_with(&["A"], &[]);
        canvas.start_editing(&id("A"));
        canvas.update_draft("hello");
        assert!(canvas.node(&id("A")).expect("A").data.output.is_empty());

        assert!(canvas.commit_draft());
        canvas.stop_editing();

        assert_eq!(canvas.node(&id("A")).expect("A").data.output, "hello");
    }
}

// =============================================================================
// TIER T4: MASONRY LAYOUT
// =============================================================================

mod t4_layout {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig {
            padding: 20.0,
            gap: 10.0,
            max_row_width: 1000.0,
            default_width: 100.0,
            default_height: 60.0,
        }
    }

    /// T4.1: Empty input, empty output.
    #[test]
    fn empty_input() {
        assert!(arrange_masonry(&[], &config()).is_empty());
    }

    /// T4.2: Equal-size nodes form a uniform row.
    #[test]
    fn equal_nodes_form_grid_row() {
        let canvas = canvas_with(&["a", "b", "c", "d"], &[]);

        let placements = arrange_masonry(canvas.nodes(), &config());

        for (i, p) in placements.iter().enumerate() {
            assert_eq!(p.position, Position::new(20.0 + i as f64 * 110.0, 20.0));
        }
    }

    /// T4.3: A wide node pushes later nodes right instead of overlapping.
    #[test]
    fn wide_node_is_not_overlapped() {
        let mut canvas = canvas_with(&["a", "wide", "c"], &[]);
        canvas.set_dimensions(&id("wide"), Some(400.0), Some(60.0));

        let placements = arrange_masonry(canvas.nodes(), &config());

        assert_eq!(placements[1].position.x, 130.0);
        assert_eq!(placements[2].position.x, 540.0);
    }

    /// T4.4: Repeated arrangement is stable.
    #[test]
    fn repeated_arrangement_is_identical() {
        let mut canvas = canvas_with(&["a", "b", "c"], &[]);
        canvas.arrange_all();
        let first: Vec<Position> = canvas.nodes().iter().map(|n| n.position).collect();

        assert_eq!(canvas.arrange_all(), 0);
        let second: Vec<Position> = canvas.nodes().iter().map(|n| n.position).collect();
        assert_eq!(first, second);
    }
}
