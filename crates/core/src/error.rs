//! Domain errors returned by lookups, mutations and report builders.

use thiserror::Error;

use crate::models::PlayerKind;

/// Errors raised by the league/roster repositories and report engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No team with the given full name exists.
    #[error("No team named '{0}'")]
    TeamNotFound(String),

    /// No player with the given name exists.
    #[error("No player named '{0}'")]
    PlayerNotFound(String),

    /// The player has no season with the given label.
    #[error("{player} has no {season} season")]
    SeasonNotFound {
        /// Player name.
        player: String,
        /// Season label that was looked up.
        season: String,
    },

    /// A team with the same full name is already registered.
    #[error("A team named '{0}' already exists")]
    DuplicateTeam(String),

    /// A player with the same name is already registered.
    #[error("A player named '{0}' already exists")]
    DuplicatePlayer(String),

    /// The player already has a season with the given label.
    #[error("{player} already has a {season} season")]
    DuplicateSeason {
        /// Player name.
        player: String,
        /// Conflicting season label.
        season: String,
    },

    /// The league cannot hold more teams.
    #[error("The league is full ({0} teams)")]
    LeagueFull(usize),

    /// A report was requested on an empty league.
    #[error("There are no teams in the league")]
    NoTeams,

    /// Division or conference sizes do not allow grouped standings.
    #[error("Teams not properly grouped: {group} has {found} teams, expected {expected}")]
    TeamsNotGrouped {
        /// Division or conference name.
        group: String,
        /// Number of teams found in the group.
        found: usize,
        /// Number of teams the report requires.
        expected: usize,
    },

    /// The operation requires the other player variant.
    #[error("{player} is a {actual}, not a {expected}")]
    WrongPlayerKind {
        /// Player name.
        player: String,
        /// Variant the operation requires.
        expected: PlayerKind,
        /// Variant the player actually is.
        actual: PlayerKind,
    },

    /// A field value failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl StatsError {
    /// Shorthand for [`StatsError::InvalidValue`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_message_names_the_group() {
        let err = StatsError::TeamsNotGrouped {
            group: "Atlantic".to_string(),
            found: 7,
            expected: 8,
        };
        assert_eq!(
            err.to_string(),
            "Teams not properly grouped: Atlantic has 7 teams, expected 8"
        );
    }
}
