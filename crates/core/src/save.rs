//! JSON persistence for the database.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::{
    database::Database,
    league::League,
    models::{Player, Team},
    roster::Roster,
};

/// Version written into every save file.
pub const SCHEMA_VERSION: u32 = 1;

/// Serialized representation of the database file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayload {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    players: Vec<Player>,
}

impl SavePayload {
    fn new(db: &Database) -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            teams: db.league().teams().to_vec(),
            players: db.roster().players().to_vec(),
        }
    }

    /// Rebuild the collections through the same checks as interactive edits.
    fn into_database(self) -> crate::Result<Database> {
        let mut league = League::new();
        for team in self.teams {
            league.insert(team)?;
        }
        let mut roster = Roster::new();
        for player in self.players {
            roster.insert(player)?;
        }
        Ok(Database::from_parts(league, roster))
    }
}

/// What happened when the database was read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read.
    Loaded {
        /// Teams read.
        teams: usize,
        /// Players read.
        players: usize,
        /// When the file was written.
        saved_at: DateTime<Utc>,
    },
    /// No file yet; starting empty.
    Missing,
    /// The file could not be used; starting empty.
    Failed(String),
}

/// Reads and writes the database file.
#[derive(Debug, Clone)]
pub struct SaveManager {
    path: PathBuf,
}

impl SaveManager {
    /// Create a manager for the provided file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the database, failing on a missing, unreadable, newer or inconsistent file.
    pub fn load(&self) -> Result<Database> {
        self.load_with_timestamp().map(|(db, _)| db)
    }

    fn load_with_timestamp(&self) -> Result<(Database, DateTime<Utc>)> {
        let payload = self.read_payload()?;
        if payload.version > SCHEMA_VERSION {
            bail!(
                "{} was written by a newer version (schema {}, supported {})",
                self.path.display(),
                payload.version,
                SCHEMA_VERSION
            );
        }
        let saved_at = payload.saved_at;
        let db = payload
            .into_database()
            .with_context(|| format!("invalid data in {}", self.path.display()))?;
        Ok((db, saved_at))
    }

    /// Load the database, starting empty when the file is missing or broken.
    pub fn load_or_default(&self) -> (Database, LoadOutcome) {
        if !self.path.exists() {
            info!("no database at {}, starting empty", self.path.display());
            return (Database::new(), LoadOutcome::Missing);
        }
        match self.load_with_timestamp() {
            Ok((db, saved_at)) => {
                let outcome = LoadOutcome::Loaded {
                    teams: db.league().len(),
                    players: db.roster().len(),
                    saved_at,
                };
                info!(?outcome, "loaded {}", self.path.display());
                (db, outcome)
            }
            Err(err) => {
                warn!("Failed to load {}: {err:#}", self.path.display());
                (Database::new(), LoadOutcome::Failed(format!("{err:#}")))
            }
        }
    }

    /// Write the database, replacing the file atomically.
    pub fn save(&self, db: &Database) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let serialised = serde_json::to_vec_pretty(&SavePayload::new(db))?;
        let mut file = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
        file.write_all(&serialised)
            .with_context(|| format!("failed to write {}", file.path().display()))?;
        file.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(
            teams = db.league().len(),
            players = db.roster().len(),
            "saved {}",
            self.path.display()
        );
        Ok(())
    }

    fn read_payload(&self) -> Result<SavePayload> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let payload = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(payload)
    }
}
