use std::sync::Arc;

use popcorn_models::{WatchedEntry, WatchedStats};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::signal::ChangeSignal;
use crate::store::{JsonStore, StoreError};

#[derive(Debug, Error)]
pub enum WatchedError {
    #[error("{imdb_id} is already in the watched list")]
    Duplicate { imdb_id: String },

    #[error("rating must be between 1 and {max}, got {rating}")]
    RatingOutOfRange { rating: u8, max: u8 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// The persisted watched list. Loaded once at construction; every mutation
/// rewrites the backing file.
#[derive(Clone)]
pub struct WatchedCollection {
    inner: Arc<WatchedInner>,
}

struct WatchedInner {
    entries: Mutex<Vec<WatchedEntry>>,
    store: JsonStore<Vec<WatchedEntry>>,
    max_rating: u8,
    signal: ChangeSignal,
}

impl WatchedCollection {
    pub fn new(store: JsonStore<Vec<WatchedEntry>>, max_rating: u8, signal: ChangeSignal) -> Self {
        let entries = store.load_or_default();
        info!("Loaded {} watched entries from {:?}", entries.len(), store.path());
        Self {
            inner: Arc::new(WatchedInner {
                entries: Mutex::new(entries),
                store,
                max_rating,
                signal,
            }),
        }
    }

    pub fn max_rating(&self) -> u8 {
        self.inner.max_rating
    }

    pub async fn entries(&self) -> Vec<WatchedEntry> {
        self.inner.entries.lock().await.clone()
    }

    pub async fn contains(&self, imdb_id: &str) -> bool {
        self.inner
            .entries
            .lock()
            .await
            .iter()
            .any(|e| e.imdb_id == imdb_id)
    }

    pub async fn user_rating_for(&self, imdb_id: &str) -> Option<u8> {
        self.inner
            .entries
            .lock()
            .await
            .iter()
            .find(|e| e.imdb_id == imdb_id)
            .map(|e| e.user_rating)
    }

    /// Append and persist. Duplicate ids are rejected; re-rating is not a
    /// flow this app offers.
    pub async fn add(&self, entry: WatchedEntry) -> Result<(), WatchedError> {
        if entry.user_rating == 0 || entry.user_rating > self.inner.max_rating {
            return Err(WatchedError::RatingOutOfRange {
                rating: entry.user_rating,
                max: self.inner.max_rating,
            });
        }

        let mut entries = self.inner.entries.lock().await;
        if entries.iter().any(|e| e.imdb_id == entry.imdb_id) {
            return Err(WatchedError::Duplicate {
                imdb_id: entry.imdb_id,
            });
        }

        entries.push(entry);
        if let Err(e) = self.inner.store.save(&entries) {
            entries.pop();
            return Err(e.into());
        }
        drop(entries);

        self.inner.signal.bump();
        Ok(())
    }

    /// Remove by id and persist. Returns whether an entry was removed.
    pub async fn remove(&self, imdb_id: &str) -> Result<bool, WatchedError> {
        let mut entries = self.inner.entries.lock().await;
        let previous = entries.clone();
        entries.retain(|e| e.imdb_id != imdb_id);

        if entries.len() == previous.len() {
            return Ok(false);
        }

        if let Err(e) = self.inner.store.save(&entries) {
            *entries = previous;
            return Err(e.into());
        }
        drop(entries);

        self.inner.signal.bump();
        Ok(true)
    }

    pub async fn stats(&self) -> WatchedStats {
        WatchedStats::from_entries(&self.inner.entries.lock().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn create_entry(imdb_id: &str, user_rating: u8) -> WatchedEntry {
        WatchedEntry {
            imdb_id: imdb_id.to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            imdb_rating: Some(8.8),
            runtime_minutes: Some(148),
            user_rating,
            added_at: Utc::now(),
        }
    }

    fn create_collection(dir: &std::path::Path) -> WatchedCollection {
        let store = JsonStore::new(dir.join("watched.json"));
        WatchedCollection::new(store, 10, ChangeSignal::new())
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_previous_state() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());
        collection.add(create_entry("tt0111161", 10)).await.unwrap();
        let before = collection.entries().await;

        collection.add(create_entry("tt1375666", 8)).await.unwrap();
        assert!(collection.remove("tt1375666").await.unwrap());

        assert_eq!(collection.entries().await, before);
    }

    #[tokio::test]
    async fn test_mutations_persist_across_reload() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());
        collection.add(create_entry("tt1375666", 8)).await.unwrap();
        collection.add(create_entry("tt0111161", 10)).await.unwrap();

        let reloaded = create_collection(dir.path());

        assert_eq!(reloaded.entries().await, collection.entries().await);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());
        collection.add(create_entry("tt1375666", 8)).await.unwrap();

        let err = collection.add(create_entry("tt1375666", 9)).await.unwrap_err();

        assert!(matches!(err, WatchedError::Duplicate { .. }));
        assert_eq!(collection.entries().await.len(), 1);
        assert_eq!(collection.user_rating_for("tt1375666").await, Some(8));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());

        let zero = collection.add(create_entry("tt1375666", 0)).await.unwrap_err();
        let high = collection.add(create_entry("tt1375666", 11)).await.unwrap_err();

        assert!(matches!(zero, WatchedError::RatingOutOfRange { .. }));
        assert!(matches!(high, WatchedError::RatingOutOfRange { .. }));
        assert!(collection.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_id_reports_false() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());

        assert!(!collection.remove("tt0000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_store_loads_as_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("watched.json"), "]]garbage[[").unwrap();

        let collection = create_collection(dir.path());

        assert!(collection.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_stats_reflect_entries() {
        let dir = tempdir().unwrap();
        let collection = create_collection(dir.path());
        collection.add(create_entry("tt1375666", 8)).await.unwrap();
        collection.add(create_entry("tt0111161", 10)).await.unwrap();

        let stats = collection.stats().await;

        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_user_rating, Some(9.0));
    }
}
