use thiserror::Error;

/// Failure taxonomy for movie-database calls. `NotFound` is an API-level
/// miss (the payload answered `Response: "False"`); the other variants are
/// transport and decoding failures.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("movie database returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("failed to decode movie database response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
