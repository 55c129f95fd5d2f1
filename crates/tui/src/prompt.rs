//! One-field-at-a-time prompt forms and their input validation.

use chrono::NaiveDate;
use nhlstats_core::{
    models::{parse_birthday, parse_season_label, MAX_COUNT},
    Conference, Database, Division, PlayerKind, StatsError,
};

/// What a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any non-blank text.
    Text,
    /// Whole number from 0 to `MAX_COUNT`.
    Count,
    /// Whole number within `MAX_COUNT` of zero either way.
    SignedCount,
    /// Jersey number, 0 to 99.
    Jersey,
    /// Decimal between 0 and 1.
    Ratio,
    /// Non-negative decimal.
    Average,
    /// `YYYY-MM-DD`.
    Date,
    /// Eastern or Western.
    Conference,
    /// One of the four divisions.
    Division,
    /// A new season label such as `2023-24`.
    SeasonLabel,
    /// Full name of an existing team.
    Team,
    /// Full name of an existing team, or blank for none.
    OptionalTeam,
    /// Name of an existing player.
    Player,
    /// Name of an existing skater.
    Skater,
    /// Name of an existing goalie.
    Goalie,
    /// A season already recorded for the player answered under `player`.
    ExistingSeason {
        /// Key of the earlier player field.
        player: &'static str,
    },
    /// `y` or `n`.
    Confirm,
}

/// A validated answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Text, or the canonical name of a referenced entity.
    Text(String),
    /// Blank optional field.
    Missing,
    /// Unsigned whole number.
    Count(u32),
    /// Signed whole number.
    Signed(i32),
    /// Jersey number.
    Jersey(u8),
    /// Decimal.
    Decimal(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Conference.
    Conference(Conference),
    /// Division.
    Division(Division),
    /// Yes or no.
    Flag(bool),
}

/// Result of checking one line of input against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Value accepted; move on.
    Accept(Answer),
    /// Malformed value; ask again.
    Retry(String),
    /// Referenced record does not exist; give up on the operation.
    Abort(String),
}

/// A single prompt in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Key the answer is stored under.
    pub key: &'static str,
    /// Prompt shown to the user.
    pub label: &'static str,
    /// Accepted input.
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    /// Validate `input` for this field against the current database.
    pub fn check(&self, input: &str, db: &Database, answers: &Answers) -> Check {
        let input = input.trim();
        match self.kind {
            FieldKind::Text => {
                if input.is_empty() {
                    Check::Retry(format!("{} cannot be blank", self.label))
                } else {
                    Check::Accept(Answer::Text(input.to_string()))
                }
            }
            FieldKind::Count => match input.parse::<u32>() {
                Ok(value) if value <= MAX_COUNT => Check::Accept(Answer::Count(value)),
                _ => Check::Retry(format!("Enter a whole number from 0 to {MAX_COUNT}")),
            },
            FieldKind::SignedCount => match input.parse::<i32>() {
                Ok(value) if value.unsigned_abs() <= MAX_COUNT => {
                    Check::Accept(Answer::Signed(value))
                }
                _ => Check::Retry(format!(
                    "Enter a whole number between -{MAX_COUNT} and {MAX_COUNT}, e.g. 12 or -4"
                )),
            },
            FieldKind::Jersey => match input.parse::<u8>() {
                Ok(value) if value <= 99 => Check::Accept(Answer::Jersey(value)),
                _ => Check::Retry("Enter a jersey number between 0 and 99".to_string()),
            },
            FieldKind::Ratio => match input.parse::<f64>() {
                Ok(value) if (0.0..=1.0).contains(&value) => Check::Accept(Answer::Decimal(value)),
                _ => Check::Retry("Enter a decimal between 0 and 1, e.g. 0.915".to_string()),
            },
            FieldKind::Average => match input.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    Check::Accept(Answer::Decimal(value))
                }
                _ => Check::Retry("Enter a decimal of zero or more, e.g. 2.45".to_string()),
            },
            FieldKind::Date => match parse_birthday(input) {
                Ok(date) => Check::Accept(Answer::Date(date)),
                Err(err) => Check::Retry(err.to_string()),
            },
            FieldKind::Conference => match input.parse::<Conference>() {
                Ok(conference) => Check::Accept(Answer::Conference(conference)),
                Err(err) => Check::Retry(err.to_string()),
            },
            FieldKind::Division => match input.parse::<Division>() {
                Ok(division) => Check::Accept(Answer::Division(division)),
                Err(err) => Check::Retry(err.to_string()),
            },
            FieldKind::SeasonLabel => match parse_season_label(input) {
                Ok(label) => Check::Accept(Answer::Text(label)),
                Err(err) => Check::Retry(err.to_string()),
            },
            FieldKind::Team => existing_team(input, db),
            FieldKind::OptionalTeam => {
                if input.is_empty() {
                    Check::Accept(Answer::Missing)
                } else {
                    existing_team(input, db)
                }
            }
            FieldKind::Player => existing_player(input, db, None),
            FieldKind::Skater => existing_player(input, db, Some(PlayerKind::Skater)),
            FieldKind::Goalie => existing_player(input, db, Some(PlayerKind::Goalie)),
            FieldKind::ExistingSeason { player } => existing_season(input, db, answers, player),
            FieldKind::Confirm => match input.to_ascii_lowercase().as_str() {
                "y" | "yes" => Check::Accept(Answer::Flag(true)),
                "n" | "no" => Check::Accept(Answer::Flag(false)),
                _ => Check::Retry("Answer y or n".to_string()),
            },
        }
    }
}

fn existing_team(input: &str, db: &Database) -> Check {
    if input.is_empty() {
        return Check::Retry("Team name cannot be blank".to_string());
    }
    match db.league().find(input) {
        Ok(team) => Check::Accept(Answer::Text(team.full_name())),
        Err(err) => Check::Abort(err.to_string()),
    }
}

fn existing_player(input: &str, db: &Database, kind: Option<PlayerKind>) -> Check {
    if input.is_empty() {
        return Check::Retry("Player name cannot be blank".to_string());
    }
    let player = match db.roster().find(input) {
        Ok(player) => player,
        Err(err) => return Check::Abort(err.to_string()),
    };
    match kind {
        Some(expected) if player.kind() != expected => Check::Abort(
            StatsError::WrongPlayerKind {
                player: player.name.clone(),
                expected,
                actual: player.kind(),
            }
            .to_string(),
        ),
        _ => Check::Accept(Answer::Text(player.name.clone())),
    }
}

fn existing_season(input: &str, db: &Database, answers: &Answers, key: &'static str) -> Check {
    let label = match parse_season_label(input) {
        Ok(label) => label,
        Err(err) => return Check::Retry(err.to_string()),
    };
    let player = match answers.text(key).and_then(|name| db.roster().find(name)) {
        Ok(player) => player,
        Err(err) => return Check::Abort(err.to_string()),
    };
    if player.career.has_season(&label) {
        Check::Accept(Answer::Text(label))
    } else {
        Check::Abort(
            StatsError::SeasonNotFound {
                player: player.name.clone(),
                season: label,
            }
            .to_string(),
        )
    }
}

/// Answers collected so far, in prompt order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    values: Vec<(&'static str, Answer)>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, answer: Answer) {
        self.values.push((key, answer));
    }

    /// Builder form of [`Answers::push`].
    #[cfg(test)]
    pub fn with(mut self, key: &'static str, answer: Answer) -> Self {
        self.push(key, answer);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Key and answer pairs in the order they were given.
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, Answer)> {
        self.values.iter()
    }

    fn get(&self, key: &'static str) -> Result<&Answer, StatsError> {
        self.values
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, answer)| answer)
            .ok_or_else(|| StatsError::invalid(key, "no answer given"))
    }

    fn mismatch(key: &'static str, expected: &str) -> StatsError {
        StatsError::invalid(key, format!("expected {expected}"))
    }

    pub fn text(&self, key: &'static str) -> Result<&str, StatsError> {
        match self.get(key)? {
            Answer::Text(value) => Ok(value),
            _ => Err(Self::mismatch(key, "text")),
        }
    }

    /// Text, or `None` for a blank optional field.
    pub fn optional_text(&self, key: &'static str) -> Result<Option<&str>, StatsError> {
        match self.get(key)? {
            Answer::Text(value) => Ok(Some(value)),
            Answer::Missing => Ok(None),
            _ => Err(Self::mismatch(key, "text")),
        }
    }

    pub fn count(&self, key: &'static str) -> Result<u32, StatsError> {
        match self.get(key)? {
            Answer::Count(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a count")),
        }
    }

    pub fn signed(&self, key: &'static str) -> Result<i32, StatsError> {
        match self.get(key)? {
            Answer::Signed(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a signed number")),
        }
    }

    pub fn jersey(&self, key: &'static str) -> Result<u8, StatsError> {
        match self.get(key)? {
            Answer::Jersey(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a jersey number")),
        }
    }

    pub fn decimal(&self, key: &'static str) -> Result<f64, StatsError> {
        match self.get(key)? {
            Answer::Decimal(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a decimal")),
        }
    }

    pub fn date(&self, key: &'static str) -> Result<NaiveDate, StatsError> {
        match self.get(key)? {
            Answer::Date(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a date")),
        }
    }

    pub fn conference(&self, key: &'static str) -> Result<Conference, StatsError> {
        match self.get(key)? {
            Answer::Conference(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a conference")),
        }
    }

    pub fn division(&self, key: &'static str) -> Result<Division, StatsError> {
        match self.get(key)? {
            Answer::Division(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "a division")),
        }
    }

    pub fn flag(&self, key: &'static str) -> Result<bool, StatsError> {
        match self.get(key)? {
            Answer::Flag(value) => Ok(*value),
            _ => Err(Self::mismatch(key, "yes or no")),
        }
    }
}

impl Answer {
    /// Short text shown next to a field that has been answered.
    pub fn display(&self) -> String {
        match self {
            Answer::Text(value) => value.clone(),
            Answer::Missing => "(none)".to_string(),
            Answer::Count(value) => value.to_string(),
            Answer::Signed(value) => format!("{value:+}"),
            Answer::Jersey(value) => format!("#{value}"),
            Answer::Decimal(value) => value.to_string(),
            Answer::Date(value) => value.format("%Y-%m-%d").to_string(),
            Answer::Conference(value) => value.to_string(),
            Answer::Division(value) => value.to_string(),
            Answer::Flag(value) => if *value { "yes" } else { "no" }.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nhlstats_core::{Player, SkaterSeason, Team};

    fn database() -> Database {
        let mut db = Database::new();
        db.league_mut()
            .add_team(Team::new("Dallas", "Stars", Conference::Western, Division::Central))
            .unwrap();
        let born = NaiveDate::from_ymd_opt(1999, 5, 14).unwrap();
        db.add_player(Player::skater("Jason Robertson", born, 21).on_team("Dallas Stars"))
            .unwrap();
        db.add_player(Player::goalie("Jake Oettinger", born, 29)).unwrap();
        db.roster_mut()
            .add_skater_season(
                "Jason Robertson",
                SkaterSeason {
                    season: "2023-24".into(),
                    games_played: 82,
                    goals: 29,
                    assists: 51,
                    plus_minus: 22,
                },
            )
            .unwrap();
        db
    }

    fn check(kind: FieldKind, input: &str) -> Check {
        Field::new("value", "Value", kind).check(input, &database(), &Answers::new())
    }

    #[test]
    fn malformed_numbers_retry() {
        assert_eq!(check(FieldKind::Count, " 42 "), Check::Accept(Answer::Count(42)));
        assert!(matches!(check(FieldKind::Count, "-1"), Check::Retry(_)));
        assert!(matches!(check(FieldKind::Count, "lots"), Check::Retry(_)));
        assert_eq!(check(FieldKind::Count, "1000"), Check::Accept(Answer::Count(1000)));
        assert_eq!(
            check(FieldKind::Count, "3000000000"),
            Check::Retry("Enter a whole number from 0 to 1000".to_string())
        );
        assert!(matches!(check(FieldKind::SignedCount, "-1001"), Check::Retry(_)));
        assert_eq!(check(FieldKind::SignedCount, "-7"), Check::Accept(Answer::Signed(-7)));
        assert!(matches!(check(FieldKind::Jersey, "100"), Check::Retry(_)));
        assert_eq!(check(FieldKind::Jersey, "99"), Check::Accept(Answer::Jersey(99)));
        assert!(matches!(check(FieldKind::Ratio, "1.2"), Check::Retry(_)));
        assert!(matches!(check(FieldKind::Average, "-0.5"), Check::Retry(_)));
        assert!(matches!(check(FieldKind::Text, "   "), Check::Retry(_)));
    }

    #[test]
    fn structured_values_parse() {
        assert_eq!(
            check(FieldKind::Date, "2000-01-01"),
            Check::Accept(Answer::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()))
        );
        assert!(matches!(check(FieldKind::Date, "01/01/2000"), Check::Retry(_)));
        assert_eq!(
            check(FieldKind::Division, "metro"),
            Check::Accept(Answer::Division(Division::Metropolitan))
        );
        assert_eq!(
            check(FieldKind::SeasonLabel, "2024-25"),
            Check::Accept(Answer::Text("2024-25".into()))
        );
        assert!(matches!(check(FieldKind::SeasonLabel, "2024-26"), Check::Retry(_)));
        assert_eq!(check(FieldKind::Confirm, "Y"), Check::Accept(Answer::Flag(true)));
    }

    #[test]
    fn missing_records_abort() {
        assert_eq!(
            check(FieldKind::Team, "Dallas Stars"),
            Check::Accept(Answer::Text("Dallas Stars".into()))
        );
        assert!(matches!(check(FieldKind::Team, "Hartford Whalers"), Check::Abort(_)));
        assert_eq!(check(FieldKind::OptionalTeam, ""), Check::Accept(Answer::Missing));
        assert_eq!(
            check(FieldKind::Player, "Nobody"),
            Check::Abort("No player named 'Nobody'".to_string())
        );
        assert!(matches!(check(FieldKind::Goalie, "Jason Robertson"), Check::Abort(_)));
        assert!(matches!(check(FieldKind::Skater, "Jason Robertson"), Check::Accept(_)));
    }

    #[test]
    fn seasons_are_checked_against_the_chosen_player() {
        let db = database();
        let answers = Answers::new().with("player", Answer::Text("Jason Robertson".into()));
        let field = Field::new("season", "Season", FieldKind::ExistingSeason { player: "player" });
        assert_eq!(
            field.check("2023-24", &db, &answers),
            Check::Accept(Answer::Text("2023-24".into()))
        );
        assert!(matches!(field.check("2022-23", &db, &answers), Check::Abort(_)));
        assert!(matches!(field.check("2022", &db, &answers), Check::Retry(_)));
    }

    #[test]
    fn typed_accessors_reject_the_wrong_shape() {
        let answers = Answers::new()
            .with("wins", Answer::Count(50))
            .with("team", Answer::Missing);
        assert_eq!(answers.count("wins"), Ok(50));
        assert!(answers.text("wins").is_err());
        assert_eq!(answers.optional_text("team"), Ok(None));
        assert!(answers.count("losses").is_err());
    }
}
