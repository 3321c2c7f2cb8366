//! # Shared Canvas
//!
//! A cloneable handle for hosts that touch one canvas from several threads.
//!
//! Writers hold the lock for the whole of one façade call, so each call is
//! atomic with respect to every other. Readers take a [`CanvasSnapshot`] and
//! release the lock immediately.
//!
//! A panic inside a closure poisons the lock; the canvas itself is never left
//! half-mutated by façade calls, so the poison is cleared and the state is
//! used as-is.

use crate::canvas::{Canvas, CanvasSnapshot};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct SharedCanvas {
    inner: Arc<RwLock<Canvas>>,
}

impl SharedCanvas {
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            inner: Arc::new(RwLock::new(canvas)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Canvas) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        self.read(Canvas::snapshot)
    }
}
