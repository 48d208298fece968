use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, details, search, watched};
use popcorn_config::PathManager;

mod commands;
mod logging;
mod output;
mod ui;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "Popcorn - search movies, rate them, remember what you watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-screen interactive mode (the default when no command is given)
    #[command(long_about = "Open the interactive browser: type to search, pick a result to see its details, rate it to add it to your watched list.")]
    Browse,

    /// Search for movies by title
    Search {
        /// Title text to search for
        query: String,
    },

    /// Show the full record for one title
    Details {
        /// IMDb id, e.g. tt1375666
        imdb_id: String,
    },

    /// Manage the watched list
    Watched {
        #[command(subcommand)]
        cmd: WatchedCommands,
    },

    /// Configure the OMDb API key and options
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List everything you've rated
    List,

    /// Aggregate statistics over the watched list
    Stats,

    /// Fetch a title, rate it, and append it to the list
    Add {
        /// IMDb id, e.g. tt1375666
        imdb_id: String,

        /// Your rating for the movie
        #[arg(long)]
        rating: u8,
    },

    /// Remove an entry by id
    Remove {
        /// IMDb id, e.g. tt1375666
        imdb_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Set a single configuration value (e.g. omdb.api_key, rating.max)
    Set {
        key: String,
        value: String,
    },

    /// Interactive setup wizard
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    let paths = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    // Interactive mode owns the terminal, so its logs go to a rolling file.
    match &command {
        Commands::Browse => logging::init_logging_with_file(
            cli.verbose,
            cli.quiet,
            Some(paths.session_log_file()),
        ),
        _ => logging::init_logging(cli.verbose, cli.quiet),
    }
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match command {
        Commands::Browse => browse::run_browse(&paths).await,
        Commands::Search { query } => search::run_search(&query, &paths, &output).await,
        Commands::Details { imdb_id } => details::run_details(&imdb_id, &paths, &output).await,
        Commands::Watched { cmd } => watched::run_watched(cmd, &paths, &output).await,
        Commands::Config { cmd } => {
            config::run_config(cmd.unwrap_or(ConfigCommands::Init), &paths, &output).await
        }
    }
}
