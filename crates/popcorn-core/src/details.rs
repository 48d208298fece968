use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use popcorn_models::MovieDetails;
use popcorn_sources::MovieSource;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::outcome::{failure_outcome, FetchOutcome};
use crate::signal::ChangeSignal;

pub const DETAILS_FAILED_MESSAGE: &str = "Something went wrong with getting the movie details";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub movie: Option<MovieDetails>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Fetches the full record for whichever movie is currently open. Selecting
/// another movie or closing the pane invalidates the fetch in flight.
#[derive(Clone)]
pub struct DetailsController {
    inner: Arc<DetailsInner>,
}

struct DetailsInner {
    source: Arc<dyn MovieSource>,
    state: Mutex<DetailsState>,
    epoch: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
    signal: ChangeSignal,
}

impl DetailsController {
    pub fn new(source: Arc<dyn MovieSource>, signal: ChangeSignal) -> Self {
        Self {
            inner: Arc::new(DetailsInner {
                source,
                state: Mutex::new(DetailsState::default()),
                epoch: AtomicU64::new(0),
                current: Mutex::new(None),
                signal,
            }),
        }
    }

    pub async fn state(&self) -> DetailsState {
        self.inner.state.lock().await.clone()
    }

    pub async fn load(&self, imdb_id: &str) -> JoinHandle<()> {
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

        {
            let mut state = self.inner.state.lock().await;
            state.movie = None;
            state.loading = true;
            state.error = None;
        }
        self.inner.signal.bump();

        let inner = Arc::clone(&self.inner);
        let imdb_id = imdb_id.to_string();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => FetchOutcome::Cancelled,
                result = inner.source.details(&imdb_id) => match result {
                    Ok(movie) => FetchOutcome::Ok(movie),
                    Err(e) => failure_outcome(e, DETAILS_FAILED_MESSAGE),
                },
            };
            inner.commit(epoch, outcome).await;
        })
    }

    /// Drop whatever is open or loading. A fetch resolving after this point
    /// is discarded.
    pub async fn clear(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.inner.current.lock().await.take() {
            token.cancel();
        }
        *self.inner.state.lock().await = DetailsState::default();
        self.inner.signal.bump();
    }
}

impl DetailsInner {
    async fn commit(&self, epoch: u64, outcome: FetchOutcome<MovieDetails>) {
        let mut state = self.state.lock().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Discarding stale details result (epoch {})", epoch);
            return;
        }

        match outcome {
            FetchOutcome::Ok(movie) => {
                debug!("Loaded details for {:?}", movie.title);
                state.movie = Some(movie);
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
