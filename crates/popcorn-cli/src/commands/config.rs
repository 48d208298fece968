use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use popcorn_config::{Config, PathManager, PLACEHOLDER_API_KEY};
use serde_json::json;

use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;

pub async fn run_config(cmd: ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, paths, output),
        ConfigCommands::Set { key, value } => set_value(&key, &value, paths, output),
        ConfigCommands::Init => run_init(paths, output),
    }
}

fn show_config(full: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();

    if !config_file.exists() {
        output.warn(&format!(
            "Configuration file not found at: {}",
            config_file.display()
        ));
        output.info("Run `popcorn config init` to create one, or set POPCORN_API_KEY.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file).map_err(|e| {
        eyre!(
            "Failed to load config from {}: {}",
            config_file.display(),
            e
        )
    })?;

    let api_key_display = if full {
        config.omdb.api_key.clone()
    } else {
        mask_string(&config.omdb.api_key)
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            table.add_row(vec![Cell::new("omdb.api_key"), Cell::new(api_key_display)]);
            table.add_row(vec![
                Cell::new("omdb.base_url"),
                Cell::new(&config.omdb.base_url),
            ]);
            table.add_row(vec![
                Cell::new("search.min_query_len"),
                Cell::new(config.search.min_query_len),
            ]);
            table.add_row(vec![Cell::new("rating.max"), Cell::new(config.rating.max)]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "omdb": {
                    "api_key": api_key_display,
                    "base_url": config.omdb.base_url,
                },
                "search": { "min_query_len": config.search.min_query_len },
                "rating": { "max": config.rating.max },
            }));
        }
    }

    Ok(())
}

fn set_value(key: &str, value: &str, paths: &PathManager, output: &Output) -> Result<()> {
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

    apply_set(&mut config, key, value).map_err(|e| eyre!(e))?;

    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(&format!("Set {} (saved to {})", key, config_file.display()));
    Ok(())
}

fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "omdb.api_key" => config.omdb.api_key = value.to_string(),
        "omdb.base_url" => config.omdb.base_url = value.to_string(),
        "search.min_query_len" => {
            let parsed: usize = value
                .parse()
                .map_err(|_| format!("search.min_query_len must be a number, got {:?}", value))?;
            if parsed == 0 {
                return Err("search.min_query_len must be at least 1".to_string());
            }
            config.search.min_query_len = parsed;
        }
        "rating.max" => {
            let parsed: u8 = value
                .parse()
                .map_err(|_| format!("rating.max must be a number, got {:?}", value))?;
            if parsed == 0 || parsed > 10 {
                return Err(format!("rating.max must be between 1 and 10, got {}", parsed));
            }
            config.rating.max = parsed;
        }
        _ => {
            return Err(format!(
                "Unknown key {:?}. Valid keys: omdb.api_key, omdb.base_url, search.min_query_len, rating.max",
                key
            ));
        }
    }
    Ok(())
}

fn run_init(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let existing = config_file.exists();
    let mut config = if existing {
        output.info(&format!(
            "Updating configuration at {}",
            config_file.display()
        ));
        Config::load_from_file(&config_file).map_err(|e| {
            eyre!(
                "Failed to load config from {}: {}",
                config_file.display(),
                e
            )
        })?
    } else {
        output.info("Starting configuration wizard...");
        Config::default()
    };
    output.println("");

    let key_prompt = if config.is_configured() {
        "OMDb API key (leave empty to keep the current one)"
    } else {
        "OMDb API key (get a free one at https://www.omdbapi.com/apikey.aspx)"
    };
    let api_key = prompts::prompt_string(key_prompt, None)?;
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        config.omdb.api_key = api_key.to_string();
    } else if !config.is_configured() {
        return Err(eyre!("An API key is required"));
    }

    config.omdb.base_url = prompts::prompt_string("API base URL", Some(&config.omdb.base_url))?;
    config.search.min_query_len =
        prompts::prompt_number("Minimum search query length", Some(config.search.min_query_len as u32))?
            as usize;
    let max_rating = prompts::prompt_number(
        "Rating scale maximum (1-10)",
        Some(u32::from(config.rating.max)),
    )?;
    config.rating.max =
        u8::try_from(max_rating).map_err(|_| eyre!("rating.max must be between 1 and 10"))?;

    config.validate().map_err(|e| eyre!("{}", e))?;

    if existing && !prompts::prompt_yes_no("Overwrite the existing configuration?", Some(true))? {
        output.warn("Aborted, nothing saved");
        return Ok(());
    }

    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(&format!(
        "Configuration saved to {}",
        config_file.display()
    ));
    output.info("Try it: popcorn search \"inception\"");
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == PLACEHOLDER_API_KEY {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_set_updates_each_key() {
        let mut config = Config::default();

        apply_set(&mut config, "omdb.api_key", "abc123").unwrap();
        apply_set(&mut config, "omdb.base_url", "https://proxy.example/").unwrap();
        apply_set(&mut config, "search.min_query_len", "2").unwrap();
        apply_set(&mut config, "rating.max", "5").unwrap();

        assert_eq!(config.omdb.api_key, "abc123");
        assert_eq!(config.omdb.base_url, "https://proxy.example/");
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.rating.max, 5);
    }

    #[test]
    fn test_apply_set_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply_set(&mut config, "rating.max", "0").is_err());
        assert!(apply_set(&mut config, "rating.max", "11").is_err());
        assert!(apply_set(&mut config, "rating.max", "many").is_err());
        assert!(apply_set(&mut config, "search.min_query_len", "0").is_err());
        assert!(apply_set(&mut config, "nope.nope", "x").is_err());
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string(PLACEHOLDER_API_KEY), "<not set>");
        assert_eq!(mask_string("ab"), "**");
        assert_eq!(mask_string("abcdef12"), "ab***12");
    }
}
