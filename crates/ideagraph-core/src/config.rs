//! # Canvas Configuration
//!
//! Tunables fixed when a [`crate::Canvas`] is constructed.
//!
//! Every field has a default from [`crate::primitives`], and the struct is
//! `#[serde(default)]`, so a config file only needs the keys it overrides.
//! Parsing the file is the app's job; this crate only defines and validates
//! the shape.

use crate::editing::InputMode;
use crate::layout::LayoutConfig;
use crate::primitives::{DUPLICATE_OFFSET_X, DUPLICATE_OFFSET_Y};
use crate::{CanvasError, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Masonry layout parameters.
    pub layout: LayoutConfig,

    /// Step applied to duplicated nodes.
    pub duplicate_offset: Position,

    /// Mode a new editing session starts in.
    pub default_input_mode: InputMode,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            duplicate_offset: Position::new(DUPLICATE_OFFSET_X, DUPLICATE_OFFSET_Y),
            default_input_mode: InputMode::default(),
        }
    }
}

impl CanvasConfig {
    /// Check ranges. Called by `Canvas::with_config`.
    pub fn validate(&self) -> Result<(), CanvasError> {
        self.layout.validate()?;

        let Position { x, y } = self.duplicate_offset;
        if !x.is_finite() || !y.is_finite() {
            return Err(CanvasError::InvalidConfig(
                "duplicate_offset must be finite".to_string(),
            ));
        }
        if x == 0.0 && y == 0.0 {
            return Err(CanvasError::InvalidConfig(
                "duplicate_offset must not be zero; copies would overlap their source".to_string(),
            ));
        }

        Ok(())
    }
}
