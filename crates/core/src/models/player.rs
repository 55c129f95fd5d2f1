#![allow(missing_docs)]

use std::fmt;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{check_count, round3, MAX_COUNT};
use crate::error::{Result, StatsError};

static SEASON_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("failed to compile season label regex"));

/// Which kind of career a player has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Skater,
    Goalie,
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKind::Skater => f.pad("skater"),
            PlayerKind::Goalie => f.pad("goalie"),
        }
    }
}

/// One season of skater statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkaterSeason {
    pub season: String,
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub plus_minus: i32,
}

impl SkaterSeason {
    pub fn points(&self) -> u32 {
        self.goals.saturating_add(self.assists)
    }

    /// Reject counts above [`MAX_COUNT`] and plus/minus beyond it either way.
    pub fn validate(&self) -> Result<()> {
        check_count("games played", self.games_played)?;
        check_count("goals", self.goals)?;
        check_count("assists", self.assists)?;
        if self.plus_minus.unsigned_abs() > MAX_COUNT {
            return Err(StatsError::invalid(
                "plus/minus",
                format!("{} is beyond {MAX_COUNT} either way", self.plus_minus),
            ));
        }
        Ok(())
    }
}

/// One season of goaltending statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalieSeason {
    pub season: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub overtime_losses: u32,
    /// Saves over shots against, between 0 and 1.
    pub save_percentage: f64,
    pub goals_against_average: f64,
}

impl GoalieSeason {
    /// Reject oversized counts, percentages outside `0..=1` and negative averages.
    pub fn validate(&self) -> Result<()> {
        check_count("games played", self.games_played)?;
        check_count("wins", self.wins)?;
        check_count("losses", self.losses)?;
        check_count("overtime losses", self.overtime_losses)?;
        if !(0.0..=1.0).contains(&self.save_percentage) {
            return Err(StatsError::invalid(
                "save percentage",
                format!("{} is not between 0 and 1", self.save_percentage),
            ));
        }
        if !self.goals_against_average.is_finite() || self.goals_against_average < 0.0 {
            return Err(StatsError::invalid(
                "goals against average",
                format!("{} is negative", self.goals_against_average),
            ));
        }
        Ok(())
    }

    /// `W-L-OT` summary.
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.overtime_losses)
    }
}

/// Season history of a player, shaped by the player's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seasons", rename_all = "snake_case")]
pub enum Career {
    Skater(Vec<SkaterSeason>),
    Goalie(Vec<GoalieSeason>),
}

impl Career {
    pub fn kind(&self) -> PlayerKind {
        match self {
            Career::Skater(_) => PlayerKind::Skater,
            Career::Goalie(_) => PlayerKind::Goalie,
        }
    }

    /// Season labels in recorded order.
    pub fn season_labels(&self) -> Vec<&str> {
        match self {
            Career::Skater(seasons) => seasons.iter().map(|s| s.season.as_str()).collect(),
            Career::Goalie(seasons) => seasons.iter().map(|s| s.season.as_str()).collect(),
        }
    }

    pub fn has_season(&self, label: &str) -> bool {
        self.season_labels().contains(&label)
    }

    pub fn len(&self) -> usize {
        match self {
            Career::Skater(seasons) => seasons.len(),
            Career::Goalie(seasons) => seasons.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A skater or goalie with their season history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub birthday: NaiveDate,
    pub number: u8,
    /// Full name of the team the player is signed with; `None` for free agents.
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub retired: bool,
    pub career: Career,
}

impl Player {
    pub fn skater(name: impl Into<String>, birthday: NaiveDate, number: u8) -> Self {
        Self::with_career(name, birthday, number, Career::Skater(Vec::new()))
    }

    pub fn goalie(name: impl Into<String>, birthday: NaiveDate, number: u8) -> Self {
        Self::with_career(name, birthday, number, Career::Goalie(Vec::new()))
    }

    fn with_career(name: impl Into<String>, birthday: NaiveDate, number: u8, career: Career) -> Self {
        Self {
            name: name.into().trim().to_string(),
            birthday,
            number,
            team: None,
            retired: false,
            career,
        }
    }

    /// Builder-style helper to set the team affiliation.
    pub fn on_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn kind(&self) -> PlayerKind {
        self.career.kind()
    }

    pub fn age(&self, today: NaiveDate) -> u32 {
        age_on(self.birthday, today)
    }

    /// Most recent skater season, if the player is a skater with any.
    pub fn current_skater_season(&self) -> Option<&SkaterSeason> {
        match &self.career {
            Career::Skater(seasons) => seasons.last(),
            Career::Goalie(_) => None,
        }
    }

    /// Most recent goalie season, if the player is a goalie with any.
    pub fn current_goalie_season(&self) -> Option<&GoalieSeason> {
        match &self.career {
            Career::Goalie(seasons) => seasons.last(),
            Career::Skater(_) => None,
        }
    }

    /// Check a player read from outside the roster: jersey range, season
    /// labels unique and well formed, every season's stats in range.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StatsError::invalid("player", "name is required"));
        }
        if self.number > 99 {
            return Err(StatsError::invalid(
                "jersey number",
                format!("{} is above 99", self.number),
            ));
        }
        let labels = self.career.season_labels();
        for (index, label) in labels.iter().enumerate() {
            parse_season_label(label)?;
            if labels[..index].contains(label) {
                return Err(StatsError::DuplicateSeason {
                    player: self.name.clone(),
                    season: label.to_string(),
                });
            }
        }
        match &self.career {
            Career::Skater(seasons) => seasons.iter().try_for_each(SkaterSeason::validate),
            Career::Goalie(seasons) => seasons.iter().try_for_each(GoalieSeason::validate),
        }
    }

    pub fn plays_for(&self, team: &str) -> bool {
        self.team.as_deref() == Some(team)
    }

    pub(crate) fn skater_seasons_mut(&mut self) -> Result<&mut Vec<SkaterSeason>> {
        let actual = self.kind();
        match &mut self.career {
            Career::Skater(seasons) => Ok(seasons),
            Career::Goalie(_) => Err(StatsError::WrongPlayerKind {
                player: self.name.clone(),
                expected: PlayerKind::Skater,
                actual,
            }),
        }
    }

    pub(crate) fn goalie_seasons_mut(&mut self) -> Result<&mut Vec<GoalieSeason>> {
        let actual = self.kind();
        match &mut self.career {
            Career::Goalie(seasons) => Ok(seasons),
            Career::Skater(_) => Err(StatsError::WrongPlayerKind {
                player: self.name.clone(),
                expected: PlayerKind::Goalie,
                actual,
            }),
        }
    }

    /// Sum of every recorded season.
    pub fn skater_totals(&self) -> Option<SkaterSeason> {
        let Career::Skater(seasons) = &self.career else {
            return None;
        };
        Some(seasons.iter().fold(
            SkaterSeason {
                season: "Career".to_string(),
                games_played: 0,
                goals: 0,
                assists: 0,
                plus_minus: 0,
            },
            |mut total, season| {
                total.games_played = total.games_played.saturating_add(season.games_played);
                total.goals = total.goals.saturating_add(season.goals);
                total.assists = total.assists.saturating_add(season.assists);
                total.plus_minus = total.plus_minus.saturating_add(season.plus_minus);
                total
            },
        ))
    }

    /// Sum of every recorded season; rates are weighted by games played.
    pub fn goalie_totals(&self) -> Option<GoalieSeason> {
        let Career::Goalie(seasons) = &self.career else {
            return None;
        };
        let mut total = GoalieSeason {
            season: "Career".to_string(),
            games_played: 0,
            wins: 0,
            losses: 0,
            overtime_losses: 0,
            save_percentage: 0.0,
            goals_against_average: 0.0,
        };
        let mut weighted_save = 0.0;
        let mut weighted_gaa = 0.0;
        for season in seasons {
            total.games_played = total.games_played.saturating_add(season.games_played);
            total.wins = total.wins.saturating_add(season.wins);
            total.losses = total.losses.saturating_add(season.losses);
            total.overtime_losses = total.overtime_losses.saturating_add(season.overtime_losses);
            weighted_save += season.save_percentage * f64::from(season.games_played);
            weighted_gaa += season.goals_against_average * f64::from(season.games_played);
        }
        if total.games_played > 0 {
            let games = f64::from(total.games_played);
            total.save_percentage = round3(weighted_save / games);
            total.goals_against_average = (weighted_gaa / games * 100.0).round() / 100.0;
        }
        Some(total)
    }
}

/// Whole years between `birthday` and `today`.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> u32 {
    if today < birthday {
        return 0;
    }
    let mut years = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Parse a `YYYY-MM-DD` birthday.
pub fn parse_birthday(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| StatsError::invalid("birthday", format!("'{}' is not YYYY-MM-DD", input.trim())))
}

/// Validate a `YYYY-YY` season label such as `2023-24`.
pub fn parse_season_label(input: &str) -> Result<String> {
    let label = input.trim();
    let caps = SEASON_LABEL_RE
        .captures(label)
        .ok_or_else(|| StatsError::invalid("season", format!("'{label}' is not YYYY-YY")))?;
    let start: u32 = caps[1]
        .parse()
        .map_err(|_| StatsError::invalid("season", format!("'{label}' is not YYYY-YY")))?;
    let end: u32 = caps[2]
        .parse()
        .map_err(|_| StatsError::invalid("season", format!("'{label}' is not YYYY-YY")))?;
    if (start + 1) % 100 != end {
        return Err(StatsError::invalid(
            "season",
            format!("'{label}' does not span consecutive years"),
        ));
    }
    Ok(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn skater_season(season: &str, goals: u32, assists: u32) -> SkaterSeason {
        SkaterSeason {
            season: season.to_string(),
            games_played: 82,
            goals,
            assists,
            plus_minus: 5,
        }
    }

    #[test]
    fn age_counts_whole_years() {
        assert_eq!(age_on(date(2000, 1, 1), date(2024, 4, 4)), 24);
        assert_eq!(age_on(date(2000, 4, 5), date(2024, 4, 4)), 23);
        assert_eq!(age_on(date(2000, 4, 4), date(2024, 4, 4)), 24);
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 4, 4)), 0);
    }

    #[test]
    fn birthday_parsing() {
        assert_eq!(parse_birthday(" 1997-01-13 ").ok(), Some(date(1997, 1, 13)));
        assert!(parse_birthday("13/01/1997").is_err());
        assert!(parse_birthday("1997-02-30").is_err());
    }

    #[test]
    fn season_labels_must_span_consecutive_years() {
        assert_eq!(parse_season_label("2023-24").ok(), Some("2023-24".to_string()));
        assert_eq!(parse_season_label("1999-00").ok(), Some("1999-00".to_string()));
        assert!(parse_season_label("2023-25").is_err());
        assert!(parse_season_label("2023").is_err());
    }

    #[test]
    fn current_season_is_the_last_recorded() {
        let mut player = Player::skater("Connor McDavid", date(1997, 1, 13), 97);
        player
            .skater_seasons_mut()
            .unwrap()
            .extend([skater_season("2022-23", 64, 89), skater_season("2023-24", 32, 100)]);
        let current = player.current_skater_season().unwrap();
        assert_eq!(current.season, "2023-24");
        assert_eq!(current.points(), 132);
        assert!(player.current_goalie_season().is_none());
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let mut goalie = Player::goalie("Igor Shesterkin", date(1995, 12, 30), 31);
        let err = goalie.skater_seasons_mut().unwrap_err();
        assert_eq!(
            err,
            StatsError::WrongPlayerKind {
                player: "Igor Shesterkin".to_string(),
                expected: PlayerKind::Skater,
                actual: PlayerKind::Goalie,
            }
        );
    }

    #[test]
    fn career_totals() {
        let mut player = Player::skater("Sidney Crosby", date(1987, 8, 7), 87);
        player
            .skater_seasons_mut()
            .unwrap()
            .extend([skater_season("2022-23", 33, 60), skater_season("2023-24", 42, 52)]);
        let totals = player.skater_totals().unwrap();
        assert_eq!(totals.games_played, 164);
        assert_eq!(totals.points(), 187);
        assert_eq!(totals.plus_minus, 10);

        let mut goalie = Player::goalie("Juuse Saros", date(1995, 4, 19), 74);
        goalie.goalie_seasons_mut().unwrap().extend([
            GoalieSeason {
                season: "2022-23".into(),
                games_played: 60,
                wins: 33,
                losses: 20,
                overtime_losses: 7,
                save_percentage: 0.920,
                goals_against_average: 2.50,
            },
            GoalieSeason {
                season: "2023-24".into(),
                games_played: 20,
                wins: 10,
                losses: 8,
                overtime_losses: 2,
                save_percentage: 0.900,
                goals_against_average: 3.00,
            },
        ]);
        let totals = goalie.goalie_totals().unwrap();
        assert_eq!(totals.games_played, 80);
        assert_eq!(totals.record(), "43-28-9");
        assert_eq!(totals.save_percentage, 0.915);
        assert_eq!(totals.goals_against_average, 2.63);
    }

    #[test]
    fn goalie_season_validation() {
        let mut season = GoalieSeason {
            season: "2023-24".into(),
            games_played: 1,
            wins: 1,
            losses: 0,
            overtime_losses: 0,
            save_percentage: 0.95,
            goals_against_average: 1.0,
        };
        assert!(season.validate().is_ok());
        season.save_percentage = 95.0;
        assert!(season.validate().is_err());
        season.save_percentage = 0.95;
        season.goals_against_average = -1.0;
        assert!(season.validate().is_err());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let mut season = skater_season("2023-24", MAX_COUNT, 0);
        assert!(season.validate().is_ok());
        season.assists = 3_000_000_000;
        assert!(season.validate().is_err());
        season.assists = 0;
        season.plus_minus = -5000;
        assert!(season.validate().is_err());
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut player = Player::skater("Big Numbers", date(2000, 1, 1), 9);
        if let Career::Skater(seasons) = &mut player.career {
            seasons.push(skater_season("2022-23", u32::MAX, u32::MAX));
            seasons.push(skater_season("2023-24", u32::MAX, 1));
        }
        let totals = player.skater_totals().unwrap();
        assert_eq!(totals.goals, u32::MAX);
        assert_eq!(totals.points(), u32::MAX);
    }

    #[test]
    fn player_validation_checks_number_and_seasons() {
        let mut player = Player::skater("Jack Hughes", date(2001, 5, 14), 86);
        assert!(player.validate().is_ok());
        if let Career::Skater(seasons) = &mut player.career {
            seasons.push(skater_season("2023-24", 27, 47));
            seasons.push(skater_season("2023-24", 1, 1));
        }
        assert_eq!(
            player.validate(),
            Err(StatsError::DuplicateSeason {
                player: "Jack Hughes".to_string(),
                season: "2023-24".to_string(),
            })
        );
        player.career = Career::Skater(vec![skater_season("2023-25", 1, 1)]);
        assert!(player.validate().is_err());
        player.career = Career::Skater(Vec::new());
        player.number = 120;
        assert!(player.validate().is_err());
    }

    #[test]
    fn career_serializes_with_kind_tag() {
        let player = Player::goalie("Linus Ullmark", date(1993, 7, 31), 35).on_team("Ottawa Senators");
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["career"]["kind"], "goalie");
        assert!(json["career"]["seasons"].as_array().unwrap().is_empty());
        assert_eq!(json["team"], "Ottawa Senators");
    }
}
