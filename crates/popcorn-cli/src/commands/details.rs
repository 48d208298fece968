use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use popcorn_config::PathManager;
use popcorn_models::MovieDetails;

use crate::output::{Output, OutputFormat};

pub async fn run_details(imdb_id: &str, paths: &PathManager, output: &Output) -> Result<()> {
    tracing::debug!("Details command started for {}", imdb_id);

    let config = super::load_config(paths)?;
    let session = super::create_session(&config, paths);

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
    let Some(movie) = state.movie else {
        output.error("No details returned");
        return Ok(());
    };

    match output.format() {
        OutputFormat::Human => print_details_card(&movie, output),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&movie)?);
        }
    }

    Ok(())
}

fn print_details_card(movie: &MovieDetails, output: &Output) {
    if output.is_quiet() {
        return;
    }

    println!("\n{} ({})", movie.title.bold(), movie.year);

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Released"), Cell::new(&movie.released)]);
    table.add_row(vec![Cell::new("Runtime"), Cell::new(runtime_label(movie))]);
    table.add_row(vec![Cell::new("Genre"), Cell::new(&movie.genre)]);
    table.add_row(vec![Cell::new("Director"), Cell::new(&movie.director)]);
    table.add_row(vec![Cell::new("Actors"), Cell::new(&movie.actors)]);
    table.add_row(vec![
        Cell::new("IMDb rating"),
        Cell::new(rating_label(movie)),
    ]);
    table.add_row(vec![Cell::new("IMDb id"), Cell::new(&movie.imdb_id)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    if !movie.plot.is_empty() {
        println!("\n{}", movie.plot.italic());
    }
    println!();
}

fn runtime_label(movie: &MovieDetails) -> String {
    match movie.runtime_minutes {
        Some(minutes) => format!("{} min", minutes),
        None => "N/A".to_string(),
    }
}

fn rating_label(movie: &MovieDetails) -> String {
    match movie.imdb_rating {
        Some(rating) => format!("⭐ {}", rating),
        None => "N/A".to_string(),
    }
}
