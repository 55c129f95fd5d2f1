//! Current-season skater and goalie leaderboards.

use std::{cmp::Ordering, fmt};

use crate::{
    models::{GoalieSeason, Player, SkaterSeason},
    report,
    roster::Roster,
};

/// Skater statistic a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkaterStat {
    /// Goals plus assists.
    Points,
    /// Goals.
    Goals,
    /// Assists.
    Assists,
    /// Plus-minus.
    PlusMinus,
}

impl SkaterStat {
    /// Every skater statistic, in menu order.
    pub const ALL: [SkaterStat; 4] = [
        SkaterStat::Points,
        SkaterStat::Goals,
        SkaterStat::Assists,
        SkaterStat::PlusMinus,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            SkaterStat::Points => "Points",
            SkaterStat::Goals => "Goals",
            SkaterStat::Assists => "Assists",
            SkaterStat::PlusMinus => "Plus-Minus",
        }
    }

    fn value(self, season: &SkaterSeason) -> i64 {
        match self {
            SkaterStat::Points => i64::from(season.points()),
            SkaterStat::Goals => i64::from(season.goals),
            SkaterStat::Assists => i64::from(season.assists),
            SkaterStat::PlusMinus => i64::from(season.plus_minus),
        }
    }
}

/// Goalie statistic a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalieStat {
    /// Wins, highest first.
    Wins,
    /// Save percentage, highest first.
    SavePercentage,
    /// Goals-against average, lowest first.
    GoalsAgainstAverage,
}

impl GoalieStat {
    /// Every goalie statistic, in menu order.
    pub const ALL: [GoalieStat; 3] = [
        GoalieStat::Wins,
        GoalieStat::SavePercentage,
        GoalieStat::GoalsAgainstAverage,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            GoalieStat::Wins => "Wins",
            GoalieStat::SavePercentage => "Save Percentage",
            GoalieStat::GoalsAgainstAverage => "Goals Against Average",
        }
    }

    fn compare(self, a: &GoalieSeason, b: &GoalieSeason) -> Ordering {
        match self {
            GoalieStat::Wins => b.wins.cmp(&a.wins),
            GoalieStat::SavePercentage => b.save_percentage.total_cmp(&a.save_percentage),
            GoalieStat::GoalsAgainstAverage => {
                a.goals_against_average.total_cmp(&b.goals_against_average)
            }
        }
    }
}

/// A ranked list of players with the season they are ranked on.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard<'a, S> {
    /// Report title.
    pub title: String,
    /// Players and their current season, best first.
    pub entries: Vec<(&'a Player, &'a S)>,
}

impl<S> Leaderboard<'_, S> {
    /// Player names in rank order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(player, _)| player.name.as_str()).collect()
    }

    /// Whether nobody qualified.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn title(label: &str, position: &str, team: Option<&str>) -> String {
    match team {
        Some(team) => format!("{team} {position} Leaders: {label}"),
        None => format!("{position} Leaders: {label}"),
    }
}

fn eligible(player: &Player, team: Option<&str>) -> bool {
    !player.retired && team.map_or(true, |team| player.plays_for(team))
}

/// Active skaters ranked by a current-season statistic, optionally on one team.
pub fn skater_leaders<'a>(
    roster: &'a Roster,
    stat: SkaterStat,
    team: Option<&str>,
) -> Leaderboard<'a, SkaterSeason> {
    let mut entries: Vec<(&Player, &SkaterSeason)> = roster
        .players()
        .iter()
        .filter(|player| eligible(player, team))
        .filter_map(|player| player.current_skater_season().map(|season| (player, season)))
        .collect();
    entries.sort_by(|(pa, sa), (pb, sb)| {
        stat.value(sb)
            .cmp(&stat.value(sa))
            .then_with(|| pa.name.cmp(&pb.name))
    });
    Leaderboard {
        title: title(stat.label(), "Skater", team),
        entries,
    }
}

/// Active goalies ranked by a current-season statistic, optionally on one team.
pub fn goalie_leaders<'a>(
    roster: &'a Roster,
    stat: GoalieStat,
    team: Option<&str>,
) -> Leaderboard<'a, GoalieSeason> {
    let mut entries: Vec<(&Player, &GoalieSeason)> = roster
        .players()
        .iter()
        .filter(|player| eligible(player, team))
        .filter_map(|player| player.current_goalie_season().map(|season| (player, season)))
        .collect();
    entries.sort_by(|(pa, sa), (pb, sb)| stat.compare(sa, sb).then_with(|| pa.name.cmp(&pb.name)));
    Leaderboard {
        title: title(stat.label(), "Goalie", team),
        entries,
    }
}

impl fmt::Display for Leaderboard<'_, SkaterSeason> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", report::section_header(&self.title))?;
        if self.is_empty() {
            return writeln!(f, "No active skaters with a recorded season.");
        }
        for (index, (player, season)) in self.entries.iter().enumerate() {
            writeln!(f, "{}", report::skater_line(index + 1, player, season))?;
        }
        Ok(())
    }
}

impl fmt::Display for Leaderboard<'_, GoalieSeason> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", report::section_header(&self.title))?;
        if self.is_empty() {
            return writeln!(f, "No active goalies with a recorded season.");
        }
        for (index, (player, season)) in self.entries.iter().enumerate() {
            writeln!(f, "{}", report::goalie_line(index + 1, player, season))?;
        }
        Ok(())
    }
}
