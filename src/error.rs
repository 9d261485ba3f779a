use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced across the public API.
///
/// `NotContained` is intentionally absent: a query whose destination lies
/// outside every composite polygon with out-of-area projection disabled is
/// not an error, it is an empty path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavError {
    #[error("build failed on polygon {polygon_index}: {reason}")]
    BuildFailed { polygon_index: usize, reason: String },

    #[error("build canceled")]
    Canceled,

    #[error("navigator index {0} out of bounds")]
    InvalidGraphId(usize),
}

pub type Result<T> = std::result::Result<T, NavError>;

/// Cooperative cancellation flag for long-running build stages.
///
/// Cloning shares the same underlying flag (it wraps an `Arc<AtomicBool>`),
/// a small `Copy`-like context threaded through hot calls, mutated from the
/// outside (e.g. by a caller-owned watchdog thread) rather than advanced
/// per tick.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns `Err(NavError::Canceled)` if cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_canceled() {
            Err(NavError::Canceled)
        } else {
            Ok(())
        }
    }
}
