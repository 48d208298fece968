use async_trait::async_trait;
use popcorn_models::{MovieDetails, MovieSummary};
use reqwest::Client;

use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieSource;

/// OMDb-style movie database client. The key and base URL are injected at
/// construction; nothing in this crate reads global configuration.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, SourceError> {
        api::get_movie_details(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
