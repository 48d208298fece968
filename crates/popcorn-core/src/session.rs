use std::sync::Arc;

use popcorn_models::WatchedEntry;
use popcorn_sources::MovieSource;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::details::DetailsController;
use crate::search::SearchController;
use crate::selection::SelectionController;
use crate::signal::ChangeSignal;
use crate::store::JsonStore;
use crate::watched::{WatchedCollection, WatchedError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no movie is currently open")]
    NoOpenMovie,

    #[error(transparent)]
    Watched(#[from] WatchedError),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub min_query_len: usize,
    pub max_rating: u8,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            max_rating: 10,
        }
    }
}

/// Wires the controllers together and owns the cross-cutting rules: a query
/// edit closes the open movie, selecting a result loads its details, rating
/// a movie appends it to the watched list and closes the pane.
#[derive(Clone)]
pub struct Session {
    search: SearchController,
    selection: SelectionController,
    details: DetailsController,
    watched: WatchedCollection,
    options: SessionOptions,
    signal: ChangeSignal,
}

impl Session {
    pub fn new(
        source: Arc<dyn MovieSource>,
        store: JsonStore<Vec<WatchedEntry>>,
        options: SessionOptions,
    ) -> Self {
        let signal = ChangeSignal::new();
        Self {
            search: SearchController::new(source.clone(), options.min_query_len, signal.clone()),
            selection: SelectionController::new(signal.clone()),
            details: DetailsController::new(source, signal.clone()),
            watched: WatchedCollection::new(store, options.max_rating, signal.clone()),
            options,
            signal,
        }
    }

    /// Receiver that changes whenever any controller commits a state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.signal.subscribe()
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn details(&self) -> &DetailsController {
        &self.details
    }

    pub fn watched(&self) -> &WatchedCollection {
        &self.watched
    }

    pub fn max_rating(&self) -> u8 {
        self.options.max_rating
    }

    pub fn min_query_len(&self) -> usize {
        self.options.min_query_len
    }

    /// Editing the query always closes whatever movie is open, then reissues
    /// the search.
    pub async fn set_query(&self, query: &str) -> Option<JoinHandle<()>> {
        self.selection.close().await;
        self.details.clear().await;
        self.search.set_query(query).await
    }

    /// Toggle a result open or closed. Opening starts the details fetch and
    /// returns its handle.
    pub async fn select(&self, imdb_id: &str) -> Option<JoinHandle<()>> {
        match self.selection.select(imdb_id).await {
            Some(id) => Some(self.details.load(&id).await),
            None => {
                self.details.clear().await;
                None
            }
        }
    }

    pub async fn close_details(&self) {
        self.selection.close().await;
        self.details.clear().await;
    }

    /// Rate the open movie and append it to the watched list. Requires loaded
    /// details; closes the pane on success.
    pub async fn add_to_watched(&self, user_rating: u8) -> Result<WatchedEntry, SessionError> {
        let movie = self
            .details
            .state()
            .await
            .movie
            .ok_or(SessionError::NoOpenMovie)?;

        let entry = WatchedEntry::from_details(&movie, user_rating);
        self.watched.add(entry.clone()).await?;
        self.close_details().await;
        Ok(entry)
    }
}
