pub mod browse;
pub mod config;
pub mod details;
pub mod prompts;
pub mod search;
pub mod watched;

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_config::{Config, PathManager};
use popcorn_core::{JsonStore, Session, SessionOptions};
use popcorn_sources::OmdbClient;

use crate::output::{Output, OutputFormat};

/// Load and validate the configuration. With no config file yet, defaults
/// plus `POPCORN_API_KEY` still make a usable setup.
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file).map_err(|e| {
            eyre!(
                "Failed to load config from {}: {}",
                config_file.display(),
                e
            )
        })?
    } else {
        Config::default()
    };

    config.apply_env_overrides();
    config.validate().map_err(|e| eyre!("{}", e))?;
    Ok(config)
}

pub fn create_session(config: &Config, paths: &PathManager) -> Session {
    let client = OmdbClient::new(config.omdb.api_key.clone(), config.omdb.base_url.clone());
    let store = JsonStore::new(paths.watched_file());
    let options = SessionOptions {
        min_query_len: config.search.min_query_len,
        max_rating: config.rating.max,
    };
    Session::new(Arc::new(client), store, options)
}

/// Spinner for one-shot fetches. Suppressed for quiet mode, JSON output, and
/// non-interactive terminals.
pub fn create_spinner(output: &Output, message: &str) -> Option<ProgressBar> {
    if output.is_quiet()
        || output.format() != OutputFormat::Human
        || !std::io::stderr().is_terminal()
    {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    Some(spinner)
}
