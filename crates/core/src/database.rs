//! The in-memory database: the league and the roster kept consistent.

use tracing::info;

use crate::{
    error::{Result, StatsError},
    league::League,
    models::Player,
    roster::Roster,
};

/// Teams and players together.
///
/// Players reference teams by full name, so operations that re-key or drop
/// a team go through here to keep those references valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    league: League,
    roster: Roster,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a database from loaded collections.
    ///
    /// Affiliations to teams that are not in the league are cleared.
    pub fn from_parts(league: League, mut roster: Roster) -> Self {
        let dangling: Vec<String> = roster
            .players()
            .iter()
            .filter_map(|player| player.team.clone())
            .filter(|team| !league.contains(team))
            .collect();
        for team in dangling {
            roster.move_team(&team, None);
        }
        Self { league, roster }
    }

    /// All teams.
    pub fn league(&self) -> &League {
        &self.league
    }

    /// Team mutations that do not change a team's identity.
    pub fn league_mut(&mut self) -> &mut League {
        &mut self.league
    }

    /// All players.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Player mutations that do not touch team affiliation.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Register a player, checking the team they are signed with exists.
    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if let Some(team) = player.team.as_deref() {
            self.league.find(team)?;
        }
        self.roster.add_player(player)
    }

    /// Change a team's city; its players follow. Returns the new full name.
    pub fn rename_team_city(&mut self, full_name: &str, city: &str) -> Result<String> {
        let new_name = self.league.set_city(full_name, city)?;
        self.repoint(full_name, &new_name);
        Ok(new_name)
    }

    /// Change a team's nickname; its players follow. Returns the new full name.
    pub fn rename_team(&mut self, full_name: &str, name: &str) -> Result<String> {
        let new_name = self.league.set_name(full_name, name)?;
        self.repoint(full_name, &new_name);
        Ok(new_name)
    }

    fn repoint(&mut self, old_name: &str, new_name: &str) {
        let moved = self.roster.move_team(old_name.trim(), Some(new_name));
        if moved > 0 {
            info!(from = %old_name.trim(), to = %new_name, moved, "Players moved with team");
        }
    }

    /// Remove a team; its players become free agents. Returns how many were released.
    pub fn remove_team(&mut self, full_name: &str) -> Result<usize> {
        let team = self.league.remove_team(full_name)?;
        let released = self.roster.move_team(&team.full_name(), None);
        info!(team = %team.full_name(), released, "Team removed");
        Ok(released)
    }

    /// Sign a player with an existing team.
    pub fn sign_player(&mut self, player: &str, team: &str) -> Result<()> {
        let team = self.league.find(team)?.full_name();
        self.roster.set_team(player, Some(team))
    }

    /// Release a player to free agency.
    pub fn release_player(&mut self, player: &str) -> Result<()> {
        let current = self.roster.find(player)?;
        if current.team.is_none() {
            return Err(StatsError::invalid(
                "team",
                format!("{} is already a free agent", current.name),
            ));
        }
        self.roster.set_team(player, None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Conference, Division, Team};

    fn database() -> Database {
        let mut db = Database::new();
        db.league_mut()
            .add_team(Team::new("Arizona", "Coyotes", Conference::Western, Division::Central))
            .unwrap();
        db.league_mut()
            .add_team(Team::new("Seattle", "Kraken", Conference::Western, Division::Pacific))
            .unwrap();
        let birthday = NaiveDate::from_ymd_opt(1996, 9, 25).unwrap();
        db.add_player(Player::skater("Clayton Keller", birthday, 9).on_team("Arizona Coyotes"))
            .unwrap();
        db.add_player(Player::goalie("Karel Vejmelka", birthday, 70).on_team("Arizona Coyotes"))
            .unwrap();
        db
    }

    #[test]
    fn renaming_a_team_moves_its_players() {
        let mut db = database();
        let new_name = db.rename_team_city("Arizona Coyotes", "Utah").unwrap();
        assert_eq!(new_name, "Utah Coyotes");
        let new_name = db.rename_team(&new_name, "Hockey Club").unwrap();
        assert_eq!(new_name, "Utah Hockey Club");
        assert_eq!(db.roster().on_team("Utah Hockey Club").count(), 2);
        assert_eq!(db.roster().on_team("Arizona Coyotes").count(), 0);
    }

    #[test]
    fn removing_a_team_frees_its_players() {
        let mut db = database();
        assert_eq!(db.remove_team("Arizona Coyotes").unwrap(), 2);
        assert!(db.roster().players().iter().all(|p| p.team.is_none()));
        assert_eq!(
            db.remove_team("Arizona Coyotes"),
            Err(StatsError::TeamNotFound("Arizona Coyotes".to_string()))
        );
    }

    #[test]
    fn signing_requires_existing_team_and_player() {
        let mut db = database();
        assert_eq!(
            db.sign_player("Clayton Keller", "Quebec Nordiques"),
            Err(StatsError::TeamNotFound("Quebec Nordiques".to_string()))
        );
        assert_eq!(
            db.sign_player("Jordan Eberle", "Seattle Kraken"),
            Err(StatsError::PlayerNotFound("Jordan Eberle".to_string()))
        );
        db.sign_player("Clayton Keller", "Seattle Kraken").unwrap();
        assert!(db.roster().find("Clayton Keller").unwrap().plays_for("Seattle Kraken"));

        db.release_player("Clayton Keller").unwrap();
        assert!(db.release_player("Clayton Keller").is_err());
    }

    #[test]
    fn adding_a_player_to_an_unknown_team_fails() {
        let mut db = database();
        let birthday = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let result = db.add_player(Player::skater("Ghost", birthday, 1).on_team("Hartford Whalers"));
        assert_eq!(result, Err(StatsError::TeamNotFound("Hartford Whalers".to_string())));
        assert!(!db.roster().contains("Ghost"));
    }

    #[test]
    fn dangling_affiliations_are_cleared_on_assembly() {
        let birthday = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let mut roster = Roster::new();
        roster
            .insert(Player::skater("Ghost", birthday, 1).on_team("Hartford Whalers"))
            .unwrap();
        let db = Database::from_parts(League::new(), roster);
        assert!(db.roster().find("Ghost").unwrap().team.is_none());
    }
}
