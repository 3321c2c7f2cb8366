//! # Formats
//!
//! Serializable shapes for moving a canvas in and out of the engine.
//! Encoding to bytes and file I/O live in the app layer.

pub mod document;

pub use document::{CanvasDocument, check_document_size};
