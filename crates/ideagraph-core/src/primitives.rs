//! # Primitives
//!
//! Compiled-in constants for the canvas engine.
//!
//! Everything here is a default: [`crate::config::CanvasConfig`] can override
//! the layout and duplication values at construction time.

// =============================================================================
// LAYOUT DEFAULTS
// =============================================================================

/// Distance from the canvas origin to the first laid-out node, on both axes.
pub const LAYOUT_PADDING: f64 = 40.0;

/// Space between neighbouring nodes, horizontally and vertically.
pub const LAYOUT_GAP: f64 = 24.0;

/// Width available to a single row before the layout wraps.
pub const LAYOUT_MAX_ROW_WIDTH: f64 = 1600.0;

/// Width assumed for nodes that have not been measured yet.
pub const DEFAULT_NODE_WIDTH: f64 = 280.0;

/// Height assumed for nodes that have not been measured yet.
pub const DEFAULT_NODE_HEIGHT: f64 = 160.0;

// =============================================================================
// DUPLICATION
// =============================================================================

/// Offset applied to a duplicated node so it does not sit exactly on its source.
pub const DUPLICATE_OFFSET_X: f64 = 40.0;

/// See [`DUPLICATE_OFFSET_X`].
pub const DUPLICATE_OFFSET_Y: f64 = 40.0;

/// Infix of generated duplicate ids: `<source>-copy-<n>`.
pub const DUPLICATE_ID_INFIX: &str = "-copy-";

// =============================================================================
// QUERY BOUNDS
// =============================================================================

/// Upper bound on the depth accepted by bounded ancestry queries.
pub const MAX_TRAVERSAL_DEPTH: usize = 1000;

// =============================================================================
// DOCUMENT FORMAT
// =============================================================================

/// Current canvas document version.
///
/// Increment this when making breaking changes to [`crate::formats::CanvasDocument`].
pub const DOCUMENT_VERSION: u32 = 1;

/// Largest canvas document the CLI will read (64 MB).
pub const MAX_DOCUMENT_SIZE: u64 = 64 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_offset_is_nonzero() {
        assert!(DUPLICATE_OFFSET_X > 0.0 || DUPLICATE_OFFSET_Y > 0.0);
    }

    #[test]
    fn default_node_fits_in_a_row() {
        assert!(DEFAULT_NODE_WIDTH < LAYOUT_MAX_ROW_WIDTH);
    }
}
