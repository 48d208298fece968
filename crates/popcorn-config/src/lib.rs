pub mod config;
pub mod paths;

pub use config::{Config, OmdbConfig, RatingOptions, SearchOptions, PLACEHOLDER_API_KEY};
pub use paths::PathManager;
