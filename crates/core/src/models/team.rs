#![allow(missing_docs)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{check_count, round3};
use crate::error::StatsError;

/// One of the two NHL conferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    Eastern,
    Western,
}

impl Conference {
    /// Conferences in report order.
    pub const ALL: [Conference; 2] = [Conference::Eastern, Conference::Western];

    pub fn name(self) -> &'static str {
        match self {
            Conference::Eastern => "Eastern",
            Conference::Western => "Western",
        }
    }

    /// The two divisions that make up the conference, in report order.
    pub fn divisions(self) -> [Division; 2] {
        match self {
            Conference::Eastern => [Division::Atlantic, Division::Metropolitan],
            Conference::Western => [Division::Central, Division::Pacific],
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Conference {
    type Err = StatsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "eastern" | "east" | "e" => Ok(Conference::Eastern),
            "western" | "west" | "w" => Ok(Conference::Western),
            other => Err(StatsError::invalid(
                "conference",
                format!("'{other}' is not Eastern or Western"),
            )),
        }
    }
}

/// One of the four NHL divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    Atlantic,
    Metropolitan,
    Central,
    Pacific,
}

impl Division {
    /// Divisions in report order.
    pub const ALL: [Division; 4] = [
        Division::Atlantic,
        Division::Metropolitan,
        Division::Central,
        Division::Pacific,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Division::Atlantic => "Atlantic",
            Division::Metropolitan => "Metropolitan",
            Division::Central => "Central",
            Division::Pacific => "Pacific",
        }
    }

    /// Conference the division belongs to.
    pub fn conference(self) -> Conference {
        match self {
            Division::Atlantic | Division::Metropolitan => Conference::Eastern,
            Division::Central | Division::Pacific => Conference::Western,
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Division {
    type Err = StatsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim().to_ascii_lowercase();
        if needle == "metro" {
            return Ok(Division::Metropolitan);
        }
        Division::ALL
            .into_iter()
            .find(|division| division.name().to_ascii_lowercase() == needle)
            .ok_or_else(|| {
                StatsError::invalid(
                    "division",
                    format!("'{needle}' is not Atlantic, Metropolitan, Central or Pacific"),
                )
            })
    }
}

/// A team and its regular-season record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub city: String,
    pub name: String,
    pub conference: Conference,
    pub division: Division,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub overtime_losses: u32,
}

impl Team {
    /// A team with an empty record.
    pub fn new(
        city: impl Into<String>,
        name: impl Into<String>,
        conference: Conference,
        division: Division,
    ) -> Self {
        Self {
            city: city.into().trim().to_string(),
            name: name.into().trim().to_string(),
            conference,
            division,
            wins: 0,
            losses: 0,
            overtime_losses: 0,
        }
    }

    /// Builder-style helper used when seeding records.
    pub fn with_record(mut self, wins: u32, losses: u32, overtime_losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.overtime_losses = overtime_losses;
        self
    }

    /// City and nickname, the key teams are looked up by.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }

    pub fn points(&self) -> u32 {
        self.wins.saturating_mul(2).saturating_add(self.overtime_losses)
    }

    pub fn games_played(&self) -> u32 {
        self.wins
            .saturating_add(self.losses)
            .saturating_add(self.overtime_losses)
    }

    /// Reject records with a count above [`super::MAX_COUNT`].
    pub fn validate_record(&self) -> Result<(), StatsError> {
        check_count("wins", self.wins)?;
        check_count("losses", self.losses)?;
        check_count("overtime losses", self.overtime_losses)
    }

    /// Share of available points earned, rounded to three decimals.
    pub fn points_percentage(&self) -> f64 {
        let games = self.games_played();
        if games == 0 {
            return 0.0;
        }
        round3(f64::from(self.points()) / (2.0 * f64::from(games)))
    }

    /// `W-L-OT` summary.
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.overtime_losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_record_values() {
        let team = Team::new("Boston", "Bruins", Conference::Eastern, Division::Atlantic)
            .with_record(50, 20, 12);
        assert_eq!(team.points(), 112);
        assert_eq!(team.games_played(), 82);
        assert_eq!(team.points_percentage(), 0.683);
        assert_eq!(team.record(), "50-20-12");
        assert_eq!(team.full_name(), "Boston Bruins");
    }

    #[test]
    fn huge_records_do_not_overflow() {
        let team = Team::new("Boston", "Bruins", Conference::Eastern, Division::Atlantic)
            .with_record(3_000_000_000, 3_000_000_000, 0);
        assert_eq!(team.points(), u32::MAX);
        assert_eq!(team.games_played(), u32::MAX);
        assert!(team.points_percentage() <= 1.0);
        assert!(team.validate_record().is_err());
    }

    #[test]
    fn no_games_means_zero_percentage() {
        let team = Team::new("Utah", "Mammoth", Conference::Western, Division::Central);
        assert_eq!(team.points_percentage(), 0.0);
    }

    #[test]
    fn parses_conference_and_division_names() {
        assert_eq!("east".parse::<Conference>().ok(), Some(Conference::Eastern));
        assert_eq!(" Western ".parse::<Conference>().ok(), Some(Conference::Western));
        assert!("northern".parse::<Conference>().is_err());

        assert_eq!("metro".parse::<Division>().ok(), Some(Division::Metropolitan));
        assert_eq!("PACIFIC".parse::<Division>().ok(), Some(Division::Pacific));
        assert!("Smythe".parse::<Division>().is_err());
    }

    #[test]
    fn divisions_belong_to_their_conference() {
        for conference in Conference::ALL {
            for division in conference.divisions() {
                assert_eq!(division.conference(), conference);
            }
        }
    }
}
