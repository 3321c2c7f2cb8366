//! # Canvas Document
//!
//! The persisted shape of one workspace: its nodes, edges and viewport,
//! tagged with a format version.
//!
//! Selection and the editing session are transient UI state and are not
//! saved. Loading validates before anything reaches a [`Canvas`]:
//!
//! - the version must match [`DOCUMENT_VERSION`]
//! - node ids must be unique, and so must edge ids
//!
//! Edges whose endpoints are missing are accepted; the engine tolerates
//! them everywhere.

use crate::canvas::Canvas;
use crate::config::CanvasConfig;
use crate::primitives::{DOCUMENT_VERSION, MAX_DOCUMENT_SIZE};
use crate::{CanvasError, Edge, EdgeId, Node, NodeId, Viewport, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reject a document by size before it is parsed.
pub fn check_document_size(size: u64) -> Result<(), CanvasError> {
    if size > MAX_DOCUMENT_SIZE {
        return Err(CanvasError::DocumentTooLarge {
            size,
            max: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            workspace_id: None,
            viewport: Viewport::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl CanvasDocument {
    /// Capture the persistent part of a canvas.
    #[must_use]
    pub fn from_canvas(canvas: &Canvas) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            workspace_id: canvas.workspace_id().cloned(),
            viewport: canvas.viewport(),
            nodes: canvas.nodes().to_vec(),
            edges: canvas.edges().to_vec(),
        }
    }

    /// Check version and id uniqueness.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.version != DOCUMENT_VERSION {
            return Err(CanvasError::UnsupportedVersion {
                found: self.version,
                expected: DOCUMENT_VERSION,
            });
        }

        let mut node_ids: BTreeSet<&NodeId> = BTreeSet::new();
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(CanvasError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut edge_ids: BTreeSet<&EdgeId> = BTreeSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(CanvasError::DuplicateEdgeId(edge.id.clone()));
            }
        }

        Ok(())
    }

    /// Validate and build a canvas holding this document's content.
    pub fn into_canvas(self, config: CanvasConfig) -> Result<Canvas, CanvasError> {
        self.validate()?;
        let mut canvas = Canvas::with_config(config)?;
        tracing::debug!(
            workspace_id = ?self.workspace_id,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "loading canvas document"
        );
        canvas.set_workspace_id(self.workspace_id);
        canvas.set_nodes(self.nodes);
        canvas.set_edges(self.edges);
        canvas.set_viewport(self.viewport);
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Timestamp};

    fn node(id: &str) -> Node {
        Node::new(id, "ws", Position::default(), Timestamp(0))
    }

    #[test]
    fn canvas_survives_document_round_trip() {
        let mut canvas = Canvas::new();
        canvas.switch_workspace(
            WorkspaceId::from("ws"),
            vec![node("a"), node("b")],
            vec![Edge::new("e", "ws", "a", "b")],
        );
        canvas.set_viewport(Viewport {
            x: 3.0,
            y: 4.0,
            zoom: 0.5,
        });

        let restored = CanvasDocument::from_canvas(&canvas)
            .into_canvas(CanvasConfig::default())
            .expect("valid document");

        assert_eq!(restored.workspace_id(), canvas.workspace_id());
        assert_eq!(restored.nodes(), canvas.nodes());
        assert_eq!(restored.edges(), canvas.edges());
        assert_eq!(restored.viewport(), canvas.viewport());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let doc = CanvasDocument {
            version: DOCUMENT_VERSION + 1,
            ..CanvasDocument::default()
        };
        assert!(matches!(
            doc.validate(),
            Err(CanvasError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let doc = CanvasDocument {
            nodes: vec![node("a"), node("a")],
            ..CanvasDocument::default()
        };
        assert!(matches!(
            doc.validate(),
            Err(CanvasError::DuplicateNodeId(id)) if id.as_str() == "a"
        ));

        let doc = CanvasDocument {
            edges: vec![Edge::new("e", "ws", "a", "b"), Edge::new("e", "ws", "b", "a")],
            ..CanvasDocument::default()
        };
        assert!(matches!(doc.validate(), Err(CanvasError::DuplicateEdgeId(_))));
    }

    #[test]
    fn dangling_edges_are_accepted() {
        let doc = CanvasDocument {
            nodes: vec![node("a")],
            edges: vec![Edge::new("e", "ws", "a", "ghost")],
            ..CanvasDocument::default()
        };
        let canvas = doc.into_canvas(CanvasConfig::default()).expect("loads");
        assert_eq!(canvas.edge_count(), 1);
    }

    #[test]
    fn size_limit_is_enforced() {
        assert!(check_document_size(MAX_DOCUMENT_SIZE).is_ok());
        assert!(matches!(
            check_document_size(MAX_DOCUMENT_SIZE + 1),
            Err(CanvasError::DocumentTooLarge { .. })
        ));
    }
}
