//! # ideagraph-core
//!
//! The state engine of an idea canvas - THE LOGIC.
//!
//! This crate owns the authoritative in-memory state of one canvas: nodes,
//! directed edges between them, the selection, the viewport and the single
//! editing session. Rendering, persistence back-ends and AI generation sit
//! outside and talk to it through [`Canvas`].
//!
//! ## Layout
//!
//! - `types` → ids, nodes, edges, field updates, errors
//! - `graph` → copy-on-write node/edge repository with a cached id index
//! - `ancestry` → upstream BFS and adjacency queries
//! - `layout` → masonry auto-layout
//! - `editing`, `selection` → transient UI state
//! - `canvas` → the mutation façade tying it all together
//! - `formats` → the persisted document shape
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: NO async, NO network, NO file I/O
//! - Fail-soft: unknown ids are no-ops, never errors
//! - Deterministic: ordered collections, injected clock, counter-based ids

// =============================================================================
// MODULES
// =============================================================================

pub mod ancestry;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod editing;
pub mod formats;
pub mod graph;
pub mod layout;
pub mod primitives;
pub mod selection;
pub mod shared;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CalendarMeta, CanvasError, Edge, EdgeId, EdgeKind, LinkPreview, Node, NodeData, NodeField,
    NodeId, NodeKind, Position, TextField, Timestamp, Viewport, WorkspaceId,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use ancestry::{connected_nodes, upstream_ids, upstream_nodes, upstream_nodes_within};
pub use canvas::{Canvas, CanvasSnapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CanvasConfig;
pub use editing::{EditingSession, EditingState, InputMode};
pub use graph::Graph;
pub use layout::{LayoutConfig, Placement, arrange_masonry};
pub use selection::{Selection, SelectionSet};
pub use shared::SharedCanvas;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{CanvasDocument, check_document_size};
