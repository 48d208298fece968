use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::PathManager;

use crate::ui;

pub async fn run_browse(paths: &PathManager) -> Result<()> {
    let config = super::load_config(paths)?;
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
    let session = super::create_session(&config, paths);

    tracing::info!("Starting interactive session");
    ui::run(session).await
}
