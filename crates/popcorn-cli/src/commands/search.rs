use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use popcorn_config::PathManager;
use serde_json::json;

use crate::output::{Output, OutputFormat};

pub async fn run_search(query: &str, paths: &PathManager, output: &Output) -> Result<()> {
    tracing::debug!("Search command started for {:?}", query);

    let config = super::load_config(paths)?;
    let session = super::create_session(&config, paths);

    if query.chars().count() < session.min_query_len() {
        output.warn(&format!(
            "Query must be at least {} characters",
            session.min_query_len()
        ));
        return Ok(());
    }

    let spinner = super::create_spinner(output, &format!("Searching for \"{}\"...", query));
    if let Some(handle) = session.set_query(query).await {
        handle.await.map_err(|e| eyre!("Search task failed: {}", e))?;
    }
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let state = session.search().state().await;
    if let Some(message) = state.error {
        output.error(&message);
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            if state.results.is_empty() {
                output.info("No results");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("#"),
                Cell::new("Title"),
                Cell::new("Year"),
                Cell::new("IMDb id"),
            ]);
            for (i, movie) in state.results.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&movie.title),
                    Cell::new(&movie.year),
                    Cell::new(&movie.imdb_id),
                ]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
            output.success(&format!("Found {} results", state.results.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "query": state.query,
                "count": state.results.len(),
                "results": state.results,
            }));
        }
    }

    Ok(())
}
