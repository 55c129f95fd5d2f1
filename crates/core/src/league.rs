//! Team repository.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{Result, StatsError},
    models::{Conference, Division, Team},
};

/// Number of teams the grouped standings expect.
pub const LEAGUE_SIZE: usize = 32;
/// Teams per division in a full league.
pub const TEAMS_PER_DIVISION: usize = 8;
/// Teams per conference in a full league.
pub const TEAMS_PER_CONFERENCE: usize = 16;

/// Ordered collection of teams keyed by full name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct League {
    teams: Vec<Team>,
}

impl League {
    /// Create an empty league.
    pub fn new() -> Self {
        Self::default()
    }

    /// Teams in insertion order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Number of registered teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether no team is registered.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Whether a team with this full name exists.
    pub fn contains(&self, full_name: &str) -> bool {
        self.position(full_name).is_some()
    }

    /// Find a team by its exact full name.
    pub fn find(&self, full_name: &str) -> Result<&Team> {
        self.position(full_name)
            .map(|index| &self.teams[index])
            .ok_or_else(|| StatsError::TeamNotFound(full_name.trim().to_string()))
    }

    fn find_mut(&mut self, full_name: &str) -> Result<&mut Team> {
        match self.position(full_name) {
            Some(index) => Ok(&mut self.teams[index]),
            None => Err(StatsError::TeamNotFound(full_name.trim().to_string())),
        }
    }

    fn position(&self, full_name: &str) -> Option<usize> {
        let needle = full_name.trim();
        self.teams.iter().position(|team| team.full_name() == needle)
    }

    /// Register a new team.
    pub fn add_team(&mut self, team: Team) -> Result<()> {
        let full_name = team.full_name();
        self.insert(team)?;
        info!(team = %full_name, "Team added");
        Ok(())
    }

    /// Append a team after the same checks as [`League::add_team`], without logging.
    pub(crate) fn insert(&mut self, team: Team) -> Result<()> {
        if team.city.is_empty() || team.name.is_empty() {
            return Err(StatsError::invalid("team", "city and name are required"));
        }
        team.validate_record()?;
        let full_name = team.full_name();
        if self.contains(&full_name) {
            return Err(StatsError::DuplicateTeam(full_name));
        }
        if self.teams.len() >= LEAGUE_SIZE {
            return Err(StatsError::LeagueFull(LEAGUE_SIZE));
        }
        self.teams.push(team);
        Ok(())
    }

    /// Change a team's city. Returns the new full name.
    pub(crate) fn set_city(&mut self, full_name: &str, city: &str) -> Result<String> {
        let current = self.find(full_name)?;
        let mut renamed = current.clone();
        renamed.city = city.trim().to_string();
        self.rekey(full_name, renamed)
    }

    /// Change a team's nickname. Returns the new full name.
    pub(crate) fn set_name(&mut self, full_name: &str, name: &str) -> Result<String> {
        let current = self.find(full_name)?;
        let mut renamed = current.clone();
        renamed.name = name.trim().to_string();
        self.rekey(full_name, renamed)
    }

    fn rekey(&mut self, full_name: &str, renamed: Team) -> Result<String> {
        if renamed.city.is_empty() || renamed.name.is_empty() {
            return Err(StatsError::invalid("team", "city and name are required"));
        }
        let new_name = renamed.full_name();
        if new_name != full_name.trim() && self.contains(&new_name) {
            return Err(StatsError::DuplicateTeam(new_name));
        }
        let team = self.find_mut(full_name)?;
        *team = renamed;
        info!(from = %full_name.trim(), to = %new_name, "Team renamed");
        Ok(new_name)
    }

    /// Move a team to another conference.
    pub fn set_conference(&mut self, full_name: &str, conference: Conference) -> Result<()> {
        self.find_mut(full_name)?.conference = conference;
        Ok(())
    }

    /// Move a team to another division.
    pub fn set_division(&mut self, full_name: &str, division: Division) -> Result<()> {
        self.find_mut(full_name)?.division = division;
        Ok(())
    }

    /// Overwrite a team's win/loss/overtime-loss record.
    pub fn set_record(
        &mut self,
        full_name: &str,
        wins: u32,
        losses: u32,
        overtime_losses: u32,
    ) -> Result<()> {
        let team = self.find_mut(full_name)?;
        let updated = team.clone().with_record(wins, losses, overtime_losses);
        updated.validate_record()?;
        *team = updated;
        info!(team = %full_name.trim(), record = %team.record(), "Record updated");
        Ok(())
    }

    /// Remove a team and return it.
    pub(crate) fn remove_team(&mut self, full_name: &str) -> Result<Team> {
        let index = self
            .position(full_name)
            .ok_or_else(|| StatsError::TeamNotFound(full_name.trim().to_string()))?;
        Ok(self.teams.remove(index))
    }
}
