#![warn(clippy::all, missing_docs)]

//! Core domain logic for the NHL stats keeper.
//!
//! This crate hosts the team and player models, the league and roster
//! collections, standings and leaderboard computation, report rendering,
//! configuration handling and JSON persistence used by the terminal UI.

pub mod config;
pub mod database;
pub mod error;
pub mod leaders;
pub mod league;
pub mod models;
pub mod report;
pub mod roster;
pub mod save;
pub mod standings;

pub use config::AppConfig;
pub use database::Database;
pub use error::{Result, StatsError};
pub use leaders::{goalie_leaders, skater_leaders, GoalieStat, Leaderboard, SkaterStat};
pub use league::League;
pub use models::{
    Career, Conference, Division, GoalieSeason, Player, PlayerKind, SkaterSeason, Team,
};
pub use roster::Roster;
pub use save::{LoadOutcome, SaveManager};
pub use standings::{
    conference_standings, division_standings, league_standings, wildcard_standings, Standings,
    StandingsMetric, StandingsSection,
};
