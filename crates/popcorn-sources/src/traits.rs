use async_trait::async_trait;
use popcorn_models::{MovieDetails, MovieSummary};

use crate::error::SourceError;

/// A movie-database backend. Implemented by the OMDb client; the controllers
/// depend on this trait so tests can substitute a scripted source.
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Title search. Returns the matching summaries in API order.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError>;

    /// Full record for one title.
    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, SourceError>;
}
