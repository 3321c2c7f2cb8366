//! # Core Type Definitions
//!
//! This module contains the data model of an idea canvas:
//! - Identifiers (`NodeId`, `EdgeId`, `WorkspaceId`) and `Timestamp`
//! - Geometry (`Position`, `Viewport`)
//! - Graph elements (`Node`, `NodeData`, `Edge`) and their tags
//! - Field updates (`NodeField`, `TextField`)
//! - Error types (`CanvasError`)
//!
//! Identifiers are caller-supplied strings. The engine never validates that
//! they are unique on the hot path; uniqueness is checked only when a whole
//! document is loaded (see [`crate::formats`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Stable identifier of a node on the canvas.
    NodeId
}

string_id! {
    /// Identifier of a directed edge.
    EdgeId
}

string_id! {
    /// Workspace (tenant) a node or edge belongs to.
    WorkspaceId
}

/// Milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `delta` scaled by `factor`.
    #[must_use]
    pub fn offset_by(self, delta: Position, factor: f64) -> Self {
        Self {
            x: self.x + delta.x * factor,
            y: self.y + delta.y * factor,
        }
    }
}

/// Pan/zoom state of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

// =============================================================================
// NODE
// =============================================================================

/// Type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A node authored directly by the user.
    #[default]
    Idea,
    /// A node produced from one or more upstream nodes.
    Derived,
}

/// Cached metadata for a URL found in a node's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LinkPreview {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// Calendar scheduling attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub start: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
    #[serde(default)]
    pub all_day: bool,
}

/// Free-form payload carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NodeData {
    /// Prompt submitted to AI generation.
    pub prompt: String,
    /// Content: user note text or generated output.
    pub output: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub pinned: bool,
    pub collapsed: bool,
    /// Set while an AI producer is streaming into `output`.
    pub is_generating: bool,
    /// Knowledge pool this node belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    /// URL -> preview.
    pub link_previews: BTreeMap<String, LinkPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarMeta>,
}

/// A single idea/content unit on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub data: NodeData,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Node {
    /// Create a node with empty data and no explicit size.
    #[must_use]
    pub fn new(
        id: impl Into<NodeId>,
        workspace_id: impl Into<WorkspaceId>,
        position: Position,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            kind: NodeKind::Idea,
            position,
            width: None,
            height: None,
            data: NodeData::default(),
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// Relationship tag of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Target was generated from source.
    #[default]
    Derived,
    /// Loose association drawn by the user.
    Related,
    /// Target cites source as supporting material.
    Reference,
}

/// A directed relationship between two nodes.
///
/// Endpoints are not validated: an edge may reference a node that does not
/// (or no longer) exist, and every query tolerates that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub workspace_id: WorkspaceId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl Edge {
    #[must_use]
    pub fn new(
        id: impl Into<EdgeId>,
        workspace_id: impl Into<WorkspaceId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Derived,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check whether `node` is either endpoint.
    #[must_use]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

// =============================================================================
// FIELD UPDATES
// =============================================================================

/// A single-field replacement applied by `Canvas::update_field`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeField {
    Kind(NodeKind),
    Position(Position),
    Dimensions {
        width: Option<f64>,
        height: Option<f64>,
    },
    Prompt(String),
    Output(String),
    Tags(Vec<String>),
    Color(Option<String>),
    Pinned(bool),
    Collapsed(bool),
    Generating(bool),
    Pool(Option<String>),
    Calendar(Option<CalendarMeta>),
    LinkPreviews(BTreeMap<String, LinkPreview>),
    /// Upsert a single preview keyed by its URL.
    LinkPreview(LinkPreview),
}

impl NodeField {
    /// Write this value into `node`. Timestamps are the caller's concern.
    pub fn apply(self, node: &mut Node) {
        match self {
            Self::Kind(kind) => node.kind = kind,
            Self::Position(position) => node.position = position,
            Self::Dimensions { width, height } => {
                node.width = width;
                node.height = height;
            }
            Self::Prompt(s) => node.data.prompt = s,
            Self::Output(s) => node.data.output = s,
            Self::Tags(tags) => node.data.tags = tags,
            Self::Color(color) => node.data.color = color,
            Self::Pinned(v) => node.data.pinned = v,
            Self::Collapsed(v) => node.data.collapsed = v,
            Self::Generating(v) => node.data.is_generating = v,
            Self::Pool(pool) => node.data.pool = pool,
            Self::Calendar(meta) => node.data.calendar = meta,
            Self::LinkPreviews(map) => node.data.link_previews = map,
            Self::LinkPreview(preview) => {
                node.data.link_previews.insert(preview.url.clone(), preview);
            }
        }
    }

    /// Short name used in log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kind(_) => "kind",
            Self::Position(_) => "position",
            Self::Dimensions { .. } => "dimensions",
            Self::Prompt(_) => "prompt",
            Self::Output(_) => "output",
            Self::Tags(_) => "tags",
            Self::Color(_) => "color",
            Self::Pinned(_) => "pinned",
            Self::Collapsed(_) => "collapsed",
            Self::Generating(_) => "is_generating",
            Self::Pool(_) => "pool",
            Self::Calendar(_) => "calendar",
            Self::LinkPreviews(_) => "link_previews",
            Self::LinkPreview(_) => "link_preview",
        }
    }
}

/// Text fields that support streaming appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Prompt,
    Output,
}

impl TextField {
    /// Mutable access to the backing string.
    pub fn get_mut(self, node: &mut Node) -> &mut String {
        match self {
            Self::Prompt => &mut node.data.prompt,
            Self::Output => &mut node.data.output,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised at construction boundaries.
///
/// Routine canvas operations never return these: a missing id is a no-op.
/// Only loading a config or a document, and app-level I/O, can fail.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two nodes in a document share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// Two edges in a document share an id.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),

    /// The document declares a version this build cannot read.
    #[error("Unsupported document version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A document exceeds the configured size bound.
    #[error("Document too large: {size} bytes exceeds {max}")]
    DocumentTooLarge { size: u64, max: u64 },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
