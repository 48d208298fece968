use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use popcorn_models::MovieSummary;
use popcorn_sources::MovieSource;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::outcome::{failure_outcome, FetchOutcome};
use crate::signal::ChangeSignal;

pub const SEARCH_FAILED_MESSAGE: &str = "Something went wrong with fetching movies";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Drives the search box. Every query edit supersedes the previous one: the
/// in-flight request is cancelled, and its result is discarded even if it
/// outruns the cancellation.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<SearchInner>,
}

struct SearchInner {
    source: Arc<dyn MovieSource>,
    min_query_len: usize,
    state: Mutex<SearchState>,
    epoch: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
    signal: ChangeSignal,
}

impl SearchController {
    pub fn new(source: Arc<dyn MovieSource>, min_query_len: usize, signal: ChangeSignal) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                source,
                min_query_len,
                state: Mutex::new(SearchState::default()),
                epoch: AtomicU64::new(0),
                current: Mutex::new(None),
                signal,
            }),
        }
    }

    pub async fn state(&self) -> SearchState {
        self.inner.state.lock().await.clone()
    }

    /// Record the new query and kick off a fetch for it. Queries below the
    /// minimum length clear the result list instead of fetching. Returns the
    /// handle of the spawned fetch, if one was started.
    pub async fn set_query(&self, query: &str) -> Option<JoinHandle<()>> {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let token = CancellationToken::new();
        if let Some(previous) = self
            .inner
            .current
            .lock()
            .await
            .replace(token.clone())
        {
            previous.cancel();
        }

        let mut state = self.inner.state.lock().await;
        state.query = query.to_string();

        if query.chars().count() < self.inner.min_query_len {
            debug!("Query {:?} below minimum length, clearing results", query);
            state.results = Vec::new();
            state.error = None;
            state.loading = false;
            drop(state);
            self.inner.signal.bump();
            return None;
        }

        state.loading = true;
        state.error = None;
        drop(state);
        self.inner.signal.bump();

        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        Some(tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => FetchOutcome::Cancelled,
                result = inner.source.search(&query) => match result {
                    Ok(results) => FetchOutcome::Ok(results),
                    Err(e) => failure_outcome(e, SEARCH_FAILED_MESSAGE),
                },
            };
            inner.commit(epoch, outcome).await;
        }))
    }
}

impl SearchInner {
    async fn commit(&self, epoch: u64, outcome: FetchOutcome<Vec<MovieSummary>>) {
        let mut state = self.state.lock().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Discarding stale search result (epoch {})", epoch);
            return;
        }

        match outcome {
            FetchOutcome::Ok(results) => {
                debug!("Search returned {} results", results.len());
                state.results = results;
                state.error = None;
                state.loading = false;
            }
            FetchOutcome::Failed(message) => {
                state.error = Some(message);
                state.loading = false;
            }
            FetchOutcome::Cancelled => return,
        }
        drop(state);
        self.signal.bump();
    }
}
