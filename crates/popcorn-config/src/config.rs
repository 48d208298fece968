use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchOptions,
    #[serde(default)]
    pub rating: RatingOptions,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchOptions {
    /// Queries shorter than this are treated as "no search".
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RatingOptions {
    /// Upper end of the user-rating scale.
    #[serde(default = "default_max_rating")]
    pub max: u8,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_min_query_len() -> usize {
    3
}

fn default_max_rating() -> u8 {
    10
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self {
            max: default_max_rating(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            omdb: OmdbConfig {
                api_key: PLACEHOLDER_API_KEY.to_string(),
                base_url: default_base_url(),
            },
            search: SearchOptions::default(),
            rating: RatingOptions::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `POPCORN_API_KEY` over the configured key. Callers decide when:
    /// commands that talk to the API apply it, `config set` and `config show`
    /// work on the file as written.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("POPCORN_API_KEY") {
            if !key.is_empty() {
                self.omdb.api_key = key;
            }
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.is_empty() || self.omdb.api_key == PLACEHOLDER_API_KEY {
            return Err(anyhow::anyhow!(
                "OMDb API key is not configured; run `popcorn config init` or set POPCORN_API_KEY"
            ));
        }
        if self.omdb.base_url.is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url cannot be empty"));
        }
        if self.rating.max == 0 || self.rating.max > 10 {
            return Err(anyhow::anyhow!(
                "rating.max must be between 1 and 10, got {}",
                self.rating.max
            ));
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.omdb.api_key.is_empty() && self.omdb.api_key != PLACEHOLDER_API_KEY
    }
}
