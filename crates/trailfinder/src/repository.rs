//! Trail repository and favorites.
//!
//! The repository owns the canonical, ordered trail list and the favorites
//! set for one session. It is loaded once from the store and writes back
//! through a [`Persister`] after every change.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::default_trails;
use crate::error::{Error, Result};
use crate::filter::{FilterParams, TrailFilter};
use crate::persist::Persister;
use crate::session::ViewGuard;
use crate::storage::{KeyValueStore, TypedStore, FAVORITES_KEY, TRAILS_KEY};
use crate::trail::Trail;

/// In-memory trail catalog and favorites, mirrored to a key-value store.
#[derive(Debug)]
pub struct TrailRepository {
    trails: Vec<Trail>,
    favorites: BTreeSet<String>,
    persister: Persister,
}

impl TrailRepository {
    /// Load the catalog and favorites from `store`.
    ///
    /// An absent, empty or unreadable trail list is replaced by the built-in
    /// catalog. Read failures are logged, never returned. The loaded state is
    /// written back once, so a fresh store ends up holding the defaults.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let state = read_state(store.as_ref()).await;
        Self::from_state(store, state)
    }

    /// Like [`load`](Self::load), but yields nothing if `guard` was closed
    /// before reading finished. A discarded load writes nothing back.
    pub async fn load_guarded(store: Arc<dyn KeyValueStore>, guard: &ViewGuard) -> Option<Self> {
        let state = guard.run(read_state(store.as_ref())).await?;
        Some(Self::from_state(store, state))
    }

    fn from_state(store: Arc<dyn KeyValueStore>, state: StoredState) -> Self {
        let StoredState { trails, favorites } = state;
        info!(
            trails = trails.len(),
            favorites = favorites.len(),
            store = store.name(),
            "Repository loaded"
        );

        let repo = Self {
            trails,
            favorites,
            persister: Persister::spawn(store),
        };
        repo.save_trails();
        repo.save_favorites();
        repo
    }

    /// All trails in catalog order.
    #[must_use]
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Look up a trail by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Trail> {
        self.trails.iter().find(|t| t.id == id)
    }

    /// Look up a trail by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTrail`] if no trail has this id.
    pub fn require(&self, id: &str) -> Result<&Trail> {
        self.get(id).ok_or_else(|| Error::unknown_trail(id))
    }

    /// The favorite trail ids.
    #[must_use]
    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Add `id` to the favorites if absent, remove it if present.
    ///
    /// Returns whether `id` is a favorite afterwards. Ids are not checked
    /// against the catalog.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        };
        debug!(trail = id, favorite = now_favorite, "Toggled favorite");
        self.save_favorites();
        now_favorite
    }

    /// The favorites among `visible`, in the order given.
    #[must_use]
    pub fn pinned<'a>(&self, visible: &[&'a Trail]) -> Vec<&'a Trail> {
        visible
            .iter()
            .copied()
            .filter(|t| self.is_favorite(&t.id))
            .collect()
    }

    /// Trails passing `params`, in catalog order.
    #[must_use]
    pub fn filter(&self, params: &FilterParams) -> Vec<&Trail> {
        TrailFilter::new(params.clone()).apply(&self.trails)
    }

    /// Replace the whole catalog. An empty list restores the default catalog.
    pub fn replace_trails(&mut self, trails: Vec<Trail>) {
        self.trails = if trails.is_empty() {
            default_trails()
        } else {
            trails
        };
        info!(trails = self.trails.len(), "Catalog replaced");
        self.save_trails();
    }

    /// Wait for every queued write to reach the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the background writer is gone.
    pub async fn flush(&self) -> Result<()> {
        self.persister.flush().await
    }

    /// Flush and stop the background writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the background writer failed.
    pub async fn close(self) -> Result<()> {
        self.persister.flush().await?;
        self.persister.shutdown().await
    }

    fn save_trails(&self) {
        if let Err(e) = self.persister.enqueue(TRAILS_KEY, &self.trails) {
            warn!(error = %e, "Could not queue trail list for saving");
        }
    }

    fn save_favorites(&self) {
        let ids: Vec<&String> = self.favorites.iter().collect();
        if let Err(e) = self.persister.enqueue(FAVORITES_KEY, &ids) {
            warn!(error = %e, "Could not queue favorites for saving");
        }
    }
}

/// What a load reads before anything is written back.
#[derive(Debug)]
struct StoredState {
    trails: Vec<Trail>,
    favorites: BTreeSet<String>,
}

async fn read_state(store: &dyn KeyValueStore) -> StoredState {
    let trails = match store.get_or(TRAILS_KEY, Vec::<Trail>::new()).await {
        Ok(trails) if !trails.is_empty() => trails,
        Ok(_) => {
            debug!("No stored trails, using default catalog");
            default_trails()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load trails, using default catalog");
            default_trails()
        }
    };

    let favorites = match store.get_or(FAVORITES_KEY, Vec::<String>::new()).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            warn!(error = %e, "Failed to load favorites, starting empty");
            BTreeSet::new()
        }
    };

    StoredState { trails, favorites }
}
