//! # Masonry Layout
//!
//! Packs nodes left-to-right, top-to-bottom into rows, honouring each node's
//! own width and height.
//!
//! - Nodes are ordered by `created_at`, ties broken by their position in the
//!   input, so the same input always yields the same arrangement.
//! - The x cursor advances by each node's own width plus the gap, so a node
//!   wider than its row-mates is never overlapped by the next one.
//! - A row ends when the next node would cross `padding + max_row_width`.
//!   The next row starts below the tallest node of the finished row.
//!
//! The layout is a pure function; applying it to a canvas is done by
//! [`crate::canvas::Canvas::arrange_all`].

use crate::primitives::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, LAYOUT_GAP, LAYOUT_MAX_ROW_WIDTH, LAYOUT_PADDING,
};
use crate::{CanvasError, Node, NodeId, Position};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Parameters of the masonry layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding: f64,
    pub gap: f64,
    pub max_row_width: f64,
    pub default_width: f64,
    pub default_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: LAYOUT_PADDING,
            gap: LAYOUT_GAP,
            max_row_width: LAYOUT_MAX_ROW_WIDTH,
            default_width: DEFAULT_NODE_WIDTH,
            default_height: DEFAULT_NODE_HEIGHT,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), CanvasError> {
        let non_negative = [("padding", self.padding), ("gap", self.gap)];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::InvalidConfig(format!(
                    "layout.{name} must be a finite value >= 0, got {value}"
                )));
            }
        }

        let positive = [
            ("max_row_width", self.max_row_width),
            ("default_width", self.default_width),
            ("default_height", self.default_height),
        ];
        for (name, value) in positive {
            if !is_usable_extent(value) {
                return Err(CanvasError::InvalidConfig(format!(
                    "layout.{name} must be a finite value > 0, got {value}"
                )));
            }
        }

        Ok(())
    }

    fn extent(&self, node: &Node) -> (f64, f64) {
        let width = node
            .width
            .filter(|w| is_usable_extent(*w))
            .unwrap_or(self.default_width);
        let height = node
            .height
            .filter(|h| is_usable_extent(*h))
            .unwrap_or(self.default_height);
        (width, height)
    }
}

fn is_usable_extent(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// =============================================================================
// ARRANGEMENT
// =============================================================================

/// Where the layout puts one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub node_id: NodeId,
    pub position: Position,
}

/// Arrange `nodes` into rows. Placements come back in arrangement order.
///
/// Empty input yields an empty arrangement; a single node lands at
/// `(padding, padding)`.
pub fn arrange_masonry(nodes: &[Node], config: &LayoutConfig) -> Vec<Placement> {
    arrange_indexed(nodes, config)
        .into_iter()
        .map(|(_, placement)| placement)
        .collect()
}

/// Like [`arrange_masonry`], pairing each placement with the index of its
/// node in `nodes` so entries sharing an id stay distinct.
pub(crate) fn arrange_indexed(nodes: &[Node], config: &LayoutConfig) -> Vec<(usize, Placement)> {
    let mut order: Vec<(usize, &Node)> = nodes.iter().enumerate().collect();
    order.sort_by_key(|(i, node)| (node.created_at, *i));

    let row_limit = config.padding + config.max_row_width;
    let mut placements = Vec::with_capacity(order.len());

    let mut x = config.padding;
    let mut y = config.padding;
    let mut row_height = 0.0_f64;
    let mut row_len = 0usize;

    for (index, node) in order {
        let (width, height) = config.extent(node);

        if row_len > 0 && x + width > row_limit {
            y += row_height + config.gap;
            x = config.padding;
            row_height = 0.0;
            row_len = 0;
        }

        placements.push((
            index,
            Placement {
                node_id: node.id.clone(),
                position: Position::new(x, y),
            },
        ));

        x += width + config.gap;
        row_height = row_height.max(height);
        row_len += 1;
    }

    placements
}

// =============================================================================
// TESTS
// =============================================================================
