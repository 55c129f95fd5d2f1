mod app;
mod menu;
mod prompt;
mod tasks;

use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use nhlstats_core::{
    config::{self, AppConfig},
    LoadOutcome, SaveManager,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let wrote_config = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;
    if wrote_config {
        info!("wrote default configuration to {}", config::config_path().display());
    }
    info!(
        data_file = %config.data_file.display(),
        autosave = config.autosave,
        "Starting nhlstats"
    );

    let saves = SaveManager::new(config.data_file.clone());
    let (db, outcome) = saves.load_or_default();
    let status = match outcome {
        LoadOutcome::Loaded {
            teams,
            players,
            saved_at,
        } => format!(
            "Loaded {teams} teams and {players} players from {} (saved {})",
            saves.path().display(),
            saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        LoadOutcome::Missing => format!(
            "No database at {}; starting empty",
            saves.path().display()
        ),
        LoadOutcome::Failed(err) => format!("Could not load database ({err}); starting empty"),
    };

    let mut app = app::NhlStatsApp::new(db, saves, &config, status);
    app.run().await
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("nhlstats.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal UI owns stdout, so events only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
