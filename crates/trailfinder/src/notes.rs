//! Per-trail free-text notes.
//!
//! Notes are a side table keyed by trail id and are not checked against the
//! catalog. Unlike repository changes, note saves are awaited so the caller
//! can report whether the text was stored.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::session::ViewGuard;
use crate::storage::{notes_key, KeyValueStore, TypedStore};

/// Access to the notes stored for each trail.
#[derive(Debug, Clone)]
pub struct TrailNotes {
    store: Arc<dyn KeyValueStore>,
}

impl TrailNotes {
    /// Notes backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The note for `trail_id`, or an empty string if there is none or it
    /// cannot be read.
    pub async fn load(&self, trail_id: &str) -> String {
        match self.store.get_or(&notes_key(trail_id), String::new()).await {
            Ok(text) => text,
            Err(e) => {
                warn!(trail = trail_id, error = %e, "Failed to load notes");
                String::new()
            }
        }
    }

    /// Like [`load`](Self::load), but yields nothing if `guard` was closed
    /// before the note arrived.
    pub async fn load_guarded(&self, trail_id: &str, guard: &ViewGuard) -> Option<String> {
        guard.run(self.load(trail_id)).await
    }

    /// Store `text`, trimmed, as the note for `trail_id`. Returns the stored
    /// text.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn save(&self, trail_id: &str, text: &str) -> Result<String> {
        let trimmed = text.trim().to_string();
        self.store.put(&notes_key(trail_id), &trimmed).await?;
        debug!(trail = trail_id, chars = trimmed.chars().count(), "Saved notes");
        Ok(trimmed)
    }

    /// Replace the note for `trail_id` with an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn clear(&self, trail_id: &str) -> Result<()> {
        self.store.put(&notes_key(trail_id), "").await?;
        debug!(trail = trail_id, "Cleared notes");
        Ok(())
    }
}
