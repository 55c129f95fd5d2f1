//! Shared domain models.

mod player;
mod team;

pub use player::{
    age_on, parse_birthday, parse_season_label, Career, GoalieSeason, Player, PlayerKind,
    SkaterSeason,
};
pub use team::{Conference, Division, Team};

use crate::error::{Result, StatsError};

/// Upper bound for any game or scoring count in a single record.
pub const MAX_COUNT: u32 = 1000;

/// Reject counts above [`MAX_COUNT`].
pub(crate) fn check_count(field: &'static str, value: u32) -> Result<()> {
    if value > MAX_COUNT {
        return Err(StatsError::invalid(
            field,
            format!("{value} is above {MAX_COUNT}"),
        ));
    }
    Ok(())
}

/// Round a ratio to three decimals, the precision used in every report.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
