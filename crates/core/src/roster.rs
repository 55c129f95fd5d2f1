//! Player repository.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{Result, StatsError},
    models::{Career, GoalieSeason, Player, SkaterSeason},
};

/// Ordered collection of players keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Players in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player is registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether a player with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Find a player by exact name.
    pub fn find(&self, name: &str) -> Result<&Player> {
        self.position(name)
            .map(|index| &self.players[index])
            .ok_or_else(|| StatsError::PlayerNotFound(name.trim().to_string()))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Player> {
        match self.position(name) {
            Some(index) => Ok(&mut self.players[index]),
            None => Err(StatsError::PlayerNotFound(name.trim().to_string())),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let needle = name.trim();
        self.players.iter().position(|player| player.name == needle)
    }

    /// Players signed with the given team, in roster order.
    pub fn on_team<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |player| player.plays_for(team))
    }

    /// Register a new player.
    pub(crate) fn add_player(&mut self, player: Player) -> Result<()> {
        let (name, kind) = (player.name.clone(), player.kind());
        self.insert(player)?;
        info!(player = %name, %kind, "Player added");
        Ok(())
    }

    /// Append a player after the same checks as [`Roster::add_player`], without logging.
    pub(crate) fn insert(&mut self, player: Player) -> Result<()> {
        player.validate()?;
        if self.contains(&player.name) {
            return Err(StatsError::DuplicatePlayer(player.name));
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove a player and return it.
    pub fn remove_player(&mut self, name: &str) -> Result<Player> {
        let index = self
            .position(name)
            .ok_or_else(|| StatsError::PlayerNotFound(name.trim().to_string()))?;
        let player = self.players.remove(index);
        info!(player = %player.name, "Player removed");
        Ok(player)
    }

    /// Rename a player, keeping names unique.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StatsError::invalid("player", "name is required"));
        }
        if new_name != name.trim() && self.contains(new_name) {
            return Err(StatsError::DuplicatePlayer(new_name.to_string()));
        }
        self.find_mut(name)?.name = new_name.to_string();
        Ok(())
    }

    /// Correct a player's birthday.
    pub fn set_birthday(&mut self, name: &str, birthday: NaiveDate) -> Result<()> {
        self.find_mut(name)?.birthday = birthday;
        Ok(())
    }

    /// Change a player's jersey number (0 to 99).
    pub fn set_number(&mut self, name: &str, number: u8) -> Result<()> {
        if number > 99 {
            return Err(StatsError::invalid("jersey number", format!("{number} is above 99")));
        }
        self.find_mut(name)?.number = number;
        Ok(())
    }

    /// Mark a player retired or active again.
    pub fn set_retired(&mut self, name: &str, retired: bool) -> Result<()> {
        self.find_mut(name)?.retired = retired;
        Ok(())
    }

    /// Set or clear the team affiliation. The caller checks the team exists.
    pub(crate) fn set_team(&mut self, name: &str, team: Option<String>) -> Result<()> {
        self.find_mut(name)?.team = team;
        Ok(())
    }

    /// Point every player of `from` at `to` (or free agency). Returns how many moved.
    pub(crate) fn move_team(&mut self, from: &str, to: Option<&str>) -> usize {
        let mut moved = 0;
        for player in self.players.iter_mut().filter(|player| player.plays_for(from)) {
            player.team = to.map(str::to_string);
            moved += 1;
        }
        moved
    }

    /// Append a skater season; labels are unique per player.
    pub fn add_skater_season(&mut self, name: &str, season: SkaterSeason) -> Result<()> {
        season.validate()?;
        let player = self.find_mut(name)?;
        let player_name = player.name.clone();
        let seasons = player.skater_seasons_mut()?;
        if seasons.iter().any(|s| s.season == season.season) {
            return Err(StatsError::DuplicateSeason {
                player: player_name,
                season: season.season,
            });
        }
        seasons.push(season);
        Ok(())
    }

    /// Append a goalie season; labels are unique per player.
    pub fn add_goalie_season(&mut self, name: &str, season: GoalieSeason) -> Result<()> {
        season.validate()?;
        let player = self.find_mut(name)?;
        let player_name = player.name.clone();
        let seasons = player.goalie_seasons_mut()?;
        if seasons.iter().any(|s| s.season == season.season) {
            return Err(StatsError::DuplicateSeason {
                player: player_name,
                season: season.season,
            });
        }
        seasons.push(season);
        Ok(())
    }

    /// Replace the stats of the skater season with the same label.
    pub fn update_skater_season(&mut self, name: &str, season: SkaterSeason) -> Result<()> {
        season.validate()?;
        let player = self.find_mut(name)?;
        let player_name = player.name.clone();
        let slot = player
            .skater_seasons_mut()?
            .iter_mut()
            .find(|s| s.season == season.season)
            .ok_or_else(|| StatsError::SeasonNotFound {
                player: player_name,
                season: season.season.clone(),
            })?;
        *slot = season;
        Ok(())
    }

    /// Replace the stats of the goalie season with the same label.
    pub fn update_goalie_season(&mut self, name: &str, season: GoalieSeason) -> Result<()> {
        season.validate()?;
        let player = self.find_mut(name)?;
        let player_name = player.name.clone();
        let slot = player
            .goalie_seasons_mut()?
            .iter_mut()
            .find(|s| s.season == season.season)
            .ok_or_else(|| StatsError::SeasonNotFound {
                player: player_name,
                season: season.season.clone(),
            })?;
        *slot = season;
        Ok(())
    }

    /// Drop one season from a player's career.
    pub fn remove_season(&mut self, name: &str, label: &str) -> Result<()> {
        let label = label.trim();
        let player = self.find_mut(name)?;
        if !player.career.has_season(label) {
            return Err(StatsError::SeasonNotFound {
                player: player.name.clone(),
                season: label.to_string(),
            });
        }
        match &mut player.career {
            Career::Skater(seasons) => seasons.retain(|s| s.season != label),
            Career::Goalie(seasons) => seasons.retain(|s| s.season != label),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerKind;

    fn birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(1997, 1, 13).unwrap()
    }

    fn skater_season(season: &str, goals: u32) -> SkaterSeason {
        SkaterSeason {
            season: season.to_string(),
            games_played: 76,
            goals,
            assists: 40,
            plus_minus: 12,
        }
    }

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster
            .add_player(Player::skater("Connor McDavid", birthday(), 97).on_team("Edmonton Oilers"))
            .unwrap();
        roster
            .add_player(Player::goalie("Stuart Skinner", birthday(), 74).on_team("Edmonton Oilers"))
            .unwrap();
        roster
    }

    #[test]
    fn missing_player_is_a_typed_error() {
        let mut roster = roster();
        let missing = StatsError::PlayerNotFound("Wayne Gretzky".to_string());
        assert_eq!(roster.find("Wayne Gretzky").unwrap_err(), missing);
        assert_eq!(roster.set_number("Wayne Gretzky", 99), Err(missing));
        assert_eq!(
            roster.add_skater_season("Wayne Gretzky", skater_season("2023-24", 1)),
            Err(StatsError::PlayerNotFound("Wayne Gretzky".to_string()))
        );
    }

    #[test]
    fn names_stay_unique() {
        let mut roster = roster();
        assert_eq!(
            roster.add_player(Player::skater("Connor McDavid", birthday(), 97)),
            Err(StatsError::DuplicatePlayer("Connor McDavid".to_string()))
        );
        assert_eq!(
            roster.rename("Stuart Skinner", "Connor McDavid"),
            Err(StatsError::DuplicatePlayer("Connor McDavid".to_string()))
        );
        roster.rename("Stuart Skinner", "Calvin Pickard").unwrap();
        assert!(roster.find("Calvin Pickard").is_ok());
    }

    #[test]
    fn season_lifecycle() {
        let mut roster = roster();
        roster
            .add_skater_season("Connor McDavid", skater_season("2022-23", 64))
            .unwrap();
        assert_eq!(
            roster.add_skater_season("Connor McDavid", skater_season("2022-23", 10)),
            Err(StatsError::DuplicateSeason {
                player: "Connor McDavid".to_string(),
                season: "2022-23".to_string(),
            })
        );

        roster
            .update_skater_season("Connor McDavid", skater_season("2022-23", 60))
            .unwrap();
        let player = roster.find("Connor McDavid").unwrap();
        assert_eq!(player.current_skater_season().unwrap().goals, 60);

        assert_eq!(
            roster.update_skater_season("Connor McDavid", skater_season("2019-20", 1)),
            Err(StatsError::SeasonNotFound {
                player: "Connor McDavid".to_string(),
                season: "2019-20".to_string(),
            })
        );

        roster.remove_season("Connor McDavid", "2022-23").unwrap();
        assert!(roster.find("Connor McDavid").unwrap().career.is_empty());
        assert!(roster.remove_season("Connor McDavid", "2022-23").is_err());
    }

    #[test]
    fn oversized_season_counts_are_rejected() {
        let mut roster = roster();
        let mut season = skater_season("2023-24", 3_000_000_000);
        assert!(roster.add_skater_season("Connor McDavid", season.clone()).is_err());
        assert!(roster.find("Connor McDavid").unwrap().career.is_empty());

        season.goals = 32;
        roster.add_skater_season("Connor McDavid", season.clone()).unwrap();
        season.games_played = 1001;
        assert!(roster.update_skater_season("Connor McDavid", season).is_err());
        let current = roster.find("Connor McDavid").unwrap().current_skater_season().unwrap();
        assert_eq!(current.games_played, 76);
    }

    #[test]
    fn season_variant_must_match_player() {
        let mut roster = roster();
        let err = roster
            .add_skater_season("Stuart Skinner", skater_season("2023-24", 0))
            .unwrap_err();
        assert!(matches!(
            err,
            StatsError::WrongPlayerKind {
                expected: PlayerKind::Skater,
                actual: PlayerKind::Goalie,
                ..
            }
        ));
    }

    #[test]
    fn moving_a_team_repoints_its_players() {
        let mut roster = roster();
        assert_eq!(roster.move_team("Edmonton Oilers", Some("Edmonton Eskimos")), 2);
        assert_eq!(roster.on_team("Edmonton Eskimos").count(), 2);
        assert_eq!(roster.move_team("Edmonton Eskimos", None), 2);
        assert!(roster.players().iter().all(|p| p.team.is_none()));
    }
}
