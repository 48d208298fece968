use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use popcorn_config::PathManager;
use popcorn_core::{Session, SessionError, WatchedError};
use serde_json::json;

use crate::output::{Output, OutputFormat};
use crate::WatchedCommands;

pub async fn run_watched(cmd: WatchedCommands, paths: &PathManager, output: &Output) -> Result<()> {
    let config = super::load_config(paths)?;
    let session = super::create_session(&config, paths);

    match cmd {
        WatchedCommands::List => list_watched(&session, output).await,
        WatchedCommands::Stats => show_stats(&session, output).await,
        WatchedCommands::Add { imdb_id, rating } => {
            add_watched(&session, &imdb_id, rating, output).await
        }
        WatchedCommands::Remove { imdb_id } => remove_watched(&session, &imdb_id, output).await,
    }
}

async fn list_watched(session: &Session, output: &Output) -> Result<()> {
    let entries = session.watched().entries().await;

    match output.format() {
        OutputFormat::Human => {
            if entries.is_empty() {
                output.info("Nothing watched yet. Rate a movie in `popcorn browse` or use `popcorn watched add`.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Title"),
                Cell::new("Year"),
                Cell::new("Your rating"),
                Cell::new("IMDb"),
                Cell::new("Runtime"),
                Cell::new("Added"),
            ]);
            for entry in &entries {
                table.add_row(vec![
                    Cell::new(&entry.title),
                    Cell::new(&entry.year),
                    Cell::new(format!("{} ★", entry.user_rating)),
                    Cell::new(option_label(entry.imdb_rating)),
                    Cell::new(
                        entry
                            .runtime_minutes
                            .map(|m| format!("{} min", m))
                            .unwrap_or_else(|| "–".to_string()),
                    ),
                    Cell::new(entry.added_at.format("%Y-%m-%d").to_string()),
                ]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
            output.success(&format!("{} movies watched", entries.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&entries)?);
        }
    }

    Ok(())
}

async fn show_stats(session: &Session, output: &Output) -> Result<()> {
    let stats = session.watched().stats().await;

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.add_row(vec![Cell::new("Movies"), Cell::new(stats.count)]);
            table.add_row(vec![
                Cell::new("Avg IMDb rating"),
                Cell::new(option_label(stats.mean_imdb_rating)),
            ]);
            table.add_row(vec![
                Cell::new("Avg your rating"),
                Cell::new(option_label(stats.mean_user_rating)),
            ]);
            table.add_row(vec![
                Cell::new("Avg runtime (min)"),
                Cell::new(option_label(stats.mean_runtime_minutes)),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&stats)?);
        }
    }

    Ok(())
}

async fn add_watched(session: &Session, imdb_id: &str, rating: u8, output: &Output) -> Result<()> {
    if session.watched().contains(imdb_id).await {
        output.warn(&format!("{} is already in the watched list", imdb_id));
        return Ok(());
    }

    let spinner = super::create_spinner(output, &format!("Fetching details for {}...", imdb_id));
    let handle = session.details().load(imdb_id).await;
    handle.await.map_err(|e| eyre!("Details task failed: {}", e))?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let state = session.details().state().await;
    if let Some(message) = state.error {
        output.error(&message);
        return Ok(());
    }

    match session.add_to_watched(rating).await {
        Ok(entry) => {
            match output.format() {
                OutputFormat::Human => {
                    output.success(&format!("Added {} ({} ★)", entry.title, entry.user_rating));
                }
                OutputFormat::Json | OutputFormat::JsonPretty => {
                    output.json(&json!({
                        "added": entry,
                    }));
                }
            }
            Ok(())
        }
        Err(SessionError::Watched(WatchedError::RatingOutOfRange { rating, max })) => {
            output.error(&format!(
                "Rating must be between 1 and {}, got {}",
                max, rating
            ));
            Ok(())
        }
        Err(e) => {
            output.error(&e.to_string());
            Ok(())
        }
    }
}

async fn remove_watched(session: &Session, imdb_id: &str, output: &Output) -> Result<()> {
    let removed = session
        .watched()
        .remove(imdb_id)
        .await
        .map_err(|e| eyre!("{}", e))?;

    if removed {
        output.success(&format!("Removed {}", imdb_id));
    } else {
        output.warn(&format!("No watched entry with id {}", imdb_id));
    }

    Ok(())
}

fn option_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "–".to_string(),
    }
}
