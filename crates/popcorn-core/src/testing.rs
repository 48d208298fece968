use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use popcorn_models::{MovieDetails, MovieSummary};
use popcorn_sources::{MovieSource, SourceError};
use tokio::sync::Notify;

pub(crate) fn create_summary(imdb_id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster_url: "https://example.com/poster.jpg".to_string(),
    }
}

pub(crate) fn create_details(imdb_id: &str) -> MovieDetails {
    MovieDetails {
        imdb_id: imdb_id.to_string(),
        title: "Inception".to_string(),
        year: "2010".to_string(),
        poster_url: "https://example.com/poster.jpg".to_string(),
        runtime_minutes: Some(148),
        imdb_rating: Some(8.8),
        plot: "A thief who steals corporate secrets.".to_string(),
        released: "16 Jul 2010".to_string(),
        actors: "Leonardo DiCaprio, Joseph Gordon-Levitt".to_string(),
        director: "Christopher Nolan".to_string(),
        genre: "Action, Adventure, Sci-Fi".to_string(),
    }
}

enum Reply<T> {
    Value(T),
    NotFound(String),
    Broken,
}

struct ScriptedReply<T> {
    reply: Reply<T>,
    gate: Option<Arc<Notify>>,
}

/// Source stub driven by per-query scripts. Each call consumes the next
/// scripted reply for its query; a gated reply blocks until its `Notify` is
/// released, which lets tests hold a request in flight.
pub(crate) struct ScriptedSource {
    searches: Mutex<HashMap<String, VecDeque<ScriptedReply<Vec<MovieSummary>>>>>,
    details: Mutex<HashMap<String, VecDeque<ScriptedReply<MovieDetails>>>>,
    search_calls: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self {
            searches: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            search_calls: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn script_search(&self, query: &str, results: Vec<MovieSummary>) {
        self.push_search(query, Reply::Value(results), None);
    }

    pub(crate) fn script_search_not_found(&self, query: &str, message: &str) {
        self.push_search(query, Reply::NotFound(message.to_string()), None);
    }

    pub(crate) fn script_search_broken(&self, query: &str) {
        self.push_search(query, Reply::Broken, None);
    }

    pub(crate) fn gate_search(&self, query: &str, results: Vec<MovieSummary>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push_search(query, Reply::Value(results), Some(gate.clone()));
        gate
    }

    pub(crate) fn script_details(&self, imdb_id: &str, details: MovieDetails) {
        self.push_details(imdb_id, Reply::Value(details), None);
    }

    pub(crate) fn script_details_not_found(&self, imdb_id: &str, message: &str) {
        self.push_details(imdb_id, Reply::NotFound(message.to_string()), None);
    }

    pub(crate) fn script_details_broken(&self, imdb_id: &str) {
        self.push_details(imdb_id, Reply::Broken, None);
    }

    pub(crate) fn gate_details(&self, imdb_id: &str, details: MovieDetails) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push_details(imdb_id, Reply::Value(details), Some(gate.clone()));
        gate
    }

    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub(crate) fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    fn push_search(
        &self,
        query: &str,
        reply: Reply<Vec<MovieSummary>>,
        gate: Option<Arc<Notify>>,
    ) {
        self.searches
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back(ScriptedReply { reply, gate });
    }

    fn push_details(&self, imdb_id: &str, reply: Reply<MovieDetails>, gate: Option<Arc<Notify>>) {
        self.details
            .lock()
            .unwrap()
            .entry(imdb_id.to_string())
            .or_default()
            .push_back(ScriptedReply { reply, gate });
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        let scripted = self
            .searches
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(|queue| queue.pop_front());
        let Some(scripted) = scripted else {
            panic!("no scripted search reply for {query:?}");
        };
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        resolve(scripted.reply)
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, SourceError> {
        self.detail_calls.lock().unwrap().push(imdb_id.to_string());
        let scripted = self
            .details
            .lock()
            .unwrap()
            .get_mut(imdb_id)
            .and_then(|queue| queue.pop_front());
        let Some(scripted) = scripted else {
            panic!("no scripted details reply for {imdb_id:?}");
        };
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        resolve(scripted.reply)
    }
}

fn resolve<T>(reply: Reply<T>) -> Result<T, SourceError> {
    match reply {
        Reply::Value(value) => Ok(value),
        Reply::NotFound(message) => Err(SourceError::NotFound { message }),
        Reply::Broken => Err(SourceError::Decode(
            serde_json::from_str::<serde_json::Value>("").unwrap_err(),
        )),
    }
}
