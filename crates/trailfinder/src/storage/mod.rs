//! Storage layer for trailfinder.
//!
//! Everything is persisted through a small async key-value contract,
//! [`KeyValueStore`], holding JSON strings. Typed access with a default
//! fallback comes from [`TypedStore`], implemented for every store.
//!
//! Two backends are provided: [`SqliteStore`] for durable local storage and
//! [`MemoryStore`] for tests and throwaway sessions.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreStats};

/// Key holding the trail list.
pub const TRAILS_KEY: &str = "trails";

/// Key holding the favorite trail ids.
pub const FAVORITES_KEY: &str = "trailFavorites";

/// Prefix of the per-trail notes keys.
pub const NOTES_KEY_PREFIX: &str = "trailNotes:";

/// The notes key for one trail.
#[must_use]
pub fn notes_key(trail_id: &str) -> String {
    format!("{NOTES_KEY_PREFIX}{trail_id}")
}

/// Async string key-value storage.
///
/// Values are opaque JSON documents. Writes are last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn set_raw(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Returns `true` if something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Typed access on top of [`KeyValueStore`].
#[async_trait]
pub trait TypedStore: KeyValueStore {
    /// Fetch and decode `key`, falling back to `default` when the key is
    /// absent or its value does not decode.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself fails.
    async fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned + Send;

    /// Encode and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    async fn put<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;
}

#[async_trait]
impl<S> TypedStore for S
where
    S: KeyValueStore + ?Sized,
{
    async fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(default);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, store = self.name(), error = %e, "Stored value did not decode, using default");
                Ok(default)
            }
        }
    }

    async fn put<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_key() {
        assert_eq!(notes_key("ember-falls-path"), "trailNotes:ember-falls-path");
    }

    #[tokio::test]
    async fn test_get_or_missing_uses_default() {
        let store = MemoryStore::new();
        let value: Vec<String> = store
            .get_or(FAVORITES_KEY, vec!["x".to_string()])
            .await
            .unwrap();
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_put_then_get_or() {
        let store = MemoryStore::new();
        store
            .put(FAVORITES_KEY, &vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let value: Vec<String> = store.get_or(FAVORITES_KEY, Vec::new()).await.unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_get_or_undecodable_uses_default() {
        let store = MemoryStore::new();
        store
            .set_raw(TRAILS_KEY, "{not json".to_string())
            .await
            .unwrap();

        let value: Vec<u32> = store.get_or(TRAILS_KEY, vec![7]).await.unwrap();
        assert_eq!(value, vec![7]);
    }

    #[tokio::test]
    async fn test_typed_access_through_trait_object() {
        let store: std::sync::Arc<dyn KeyValueStore> = std::sync::Arc::new(MemoryStore::new());
        store.put("k", "hello").await.unwrap();
        let value: String = store.get_or("k", String::new()).await.unwrap();
        assert_eq!(value, "hello");
    }
}
