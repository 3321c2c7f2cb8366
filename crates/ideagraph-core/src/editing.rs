//! # Editing Session
//!
//! The single-editor state machine: `Idle` or `Editing(node)`.
//!
//! At most one node is ever being edited. That is enforced by the shape of
//! [`EditingState`] rather than by any lock: there is one optional editing
//! slot, and the draft buffer and input mode live inside it, so leaving the
//! editing state drops them together.
//!
//! This module does not know about nodes. Checking that the node exists on
//! `start`, and forcing `Idle` when the edited node is deleted, is done by
//! [`crate::canvas::Canvas`].

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// How text typed into the editor is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Plain content written into the node.
    #[default]
    Note,
    /// A prompt to submit for AI generation.
    Ai,
}

impl InputMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Note => Self::Ai,
            Self::Ai => Self::Note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditingState {
    #[default]
    Idle,
    Editing {
        node_id: NodeId,
        /// Unsaved text. `None` until the first keystroke.
        draft: Option<String>,
        input_mode: InputMode,
    },
}

/// Editing session with a configurable default input mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditingSession {
    state: EditingState,
    default_mode: InputMode,
}

impl EditingSession {
    #[must_use]
    pub fn new(default_mode: InputMode) -> Self {
        Self {
            state: EditingState::Idle,
            default_mode,
        }
    }

    pub fn state(&self) -> &EditingState {
        &self.state
    }

    pub fn editing_node_id(&self) -> Option<&NodeId> {
        match &self.state {
            EditingState::Idle => None,
            EditingState::Editing { node_id, .. } => Some(node_id),
        }
    }

    pub fn draft_content(&self) -> Option<&str> {
        match &self.state {
            EditingState::Idle => None,
            EditingState::Editing { draft, .. } => draft.as_deref(),
        }
    }

    /// Current mode; the default mode while idle.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match &self.state {
            EditingState::Idle => self.default_mode,
            EditingState::Editing { input_mode, .. } => *input_mode,
        }
    }

    #[must_use]
    pub fn is_editing(&self, node: &NodeId) -> bool {
        self.editing_node_id() == Some(node)
    }

    /// Enter `Editing(node_id)`, dropping any previous session and its draft.
    ///
    /// Returns the unsaved draft that was discarded, if any, so the caller
    /// can log it. It is not written anywhere.
    pub fn start(&mut self, node_id: NodeId) -> Option<String> {
        let previous = std::mem::replace(
            &mut self.state,
            EditingState::Editing {
                node_id,
                draft: None,
                input_mode: self.default_mode,
            },
        );
        match previous {
            EditingState::Editing { draft, .. } => draft,
            EditingState::Idle => None,
        }
    }

    /// Store unsaved text. Ignored while idle.
    pub fn update_draft(&mut self, content: impl Into<String>) -> bool {
        match &mut self.state {
            EditingState::Editing { draft, .. } => {
                *draft = Some(content.into());
                true
            }
            EditingState::Idle => false,
        }
    }

    /// Switch input mode without leaving the session. Ignored while idle.
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        match &mut self.state {
            EditingState::Editing { input_mode, .. } => {
                *input_mode = mode;
                true
            }
            EditingState::Idle => false,
        }
    }

    pub fn toggle_input_mode(&mut self) -> bool {
        let next = self.input_mode().toggled();
        self.set_input_mode(next)
    }

    /// Return to `Idle`. The draft is dropped; persist it first if needed.
    pub fn stop(&mut self) {
        self.state = EditingState::Idle;
    }

    /// Return to `Idle` only if `node` is the one being edited.
    pub fn release(&mut self, node: &NodeId) -> bool {
        if self.is_editing(node) {
            self.stop();
            true
        } else {
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
