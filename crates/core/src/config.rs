//! Application configuration loaded from `config.toml` and `NHLSTATS_*` variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "nhlstats";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "database.json";

const DEFAULT_CONFIG: &str = r#"# nhlstats configuration
#
# Every key can also be set through an NHLSTATS_<KEY> environment variable.

# Where teams and players are stored.
# data_file = "/path/to/database.json"

# Directory for nhlstats.log.
# log_dir = "logs"

# Write the database after every change. When false, changes are written
# when leaving an edit menu and on quit.
# autosave = true

# Fixed date used to compute player ages, as a quoted YYYY-MM-DD string.
# today = "2024-04-04"
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// JSON database location.
    pub data_file: PathBuf,
    /// Directory the log file is written to.
    pub log_dir: PathBuf,
    /// Persist after every mutating operation.
    pub autosave: bool,
    /// Override for the current date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_dir: PathBuf::from("logs"),
            autosave: true,
            today: None,
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from a specific config file, which may be missing, and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_file", defaults.data_file.to_string_lossy().into_owned())?
            .set_default("log_dir", defaults.log_dir.to_string_lossy().into_owned())?
            .set_default("autosave", defaults.autosave)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("NHLSTATS").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(config)
    }

    /// The date ages are computed against.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default database location under the user's data directory.
pub fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(DATABASE_FILE)
}

/// Write a commented config template if the user has none yet.
/// Returns whether a new file was written.
pub fn ensure_default_config() -> Result<bool> {
    ensure_config_at(&config_path())
}

/// Write the config template to `path` unless something is already there.
pub fn ensure_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
