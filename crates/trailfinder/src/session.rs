//! View lifetime guards.
//!
//! A view that starts an asynchronous load holds a [`ViewGuard`]. Closing the
//! guard before the load resolves makes the result be discarded instead of
//! applied to state that no longer has an owner.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Cloneable open/closed flag shared between a view and its pending loads.
#[derive(Debug, Clone, Default)]
pub struct ViewGuard {
    closed: Arc<AtomicBool>,
}

impl ViewGuard {
    /// Create an open guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the view as gone.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Whether the view is still around.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    /// Await `load`, keeping its output only if the view is still open once it
    /// resolves.
    pub async fn run<F>(&self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        let output = load.await;
        if self.is_open() {
            Some(output)
        } else {
            debug!("View closed before load finished, discarding result");
            None
        }
    }
}
