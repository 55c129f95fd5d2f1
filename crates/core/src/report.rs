//! Plain-text rendering shared by the standings, leaderboards and views.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::{
    database::Database,
    error::Result,
    models::{Career, GoalieSeason, Player, SkaterSeason, Team},
};

/// Separator printed where the playoff picture is cut.
pub const CUT_LINE: &str = "- - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -";

const NAME_WIDTH: usize = 28;

/// Report title line.
pub fn banner(title: &str) -> String {
    format!("======== {title} ========")
}

/// Section header line.
pub fn section_header(title: &str) -> String {
    format!("**** {title} ****")
}

/// One ranked team line: name, games played, points, record and points percentage.
pub fn team_line(rank: usize, team: &Team) -> String {
    format!(
        "{rank:>2}. {name:<width$}\tGP: {gp:>2}\tPTS: {pts:>3}\t{record:<9}\tP%: {pct:.3}",
        name = team.full_name(),
        width = NAME_WIDTH,
        gp = team.games_played(),
        pts = team.points(),
        record = team.record(),
        pct = team.points_percentage(),
    )
}

/// Ranked skater line for a single season.
pub fn skater_line(rank: usize, player: &Player, season: &SkaterSeason) -> String {
    format!(
        "{rank:>2}. {name:<width$}\t{team:<width$}\t{stats}",
        name = player.name,
        team = team_label(player),
        width = NAME_WIDTH,
        stats = skater_stats(season),
    )
}

/// Ranked goalie line for a single season.
pub fn goalie_line(rank: usize, player: &Player, season: &GoalieSeason) -> String {
    format!(
        "{rank:>2}. {name:<width$}\t{team:<width$}\t{stats}",
        name = player.name,
        team = team_label(player),
        width = NAME_WIDTH,
        stats = goalie_stats(season),
    )
}

fn skater_stats(season: &SkaterSeason) -> String {
    format!(
        "GP: {:>2}\tG: {:>2}\tA: {:>3}\tP: {:>3}\t+/-: {:>+3}",
        season.games_played,
        season.goals,
        season.assists,
        season.points(),
        season.plus_minus,
    )
}

fn goalie_stats(season: &GoalieSeason) -> String {
    format!(
        "GP: {:>2}\t{:<9}\tSV%: {:.3}\tGAA: {:.2}",
        season.games_played,
        season.record(),
        season.save_percentage,
        season.goals_against_average,
    )
}

fn team_label(player: &Player) -> &str {
    player.team.as_deref().unwrap_or("Free Agent")
}

/// Every team in league order with its record.
pub fn team_list(db: &Database) -> String {
    let league = db.league();
    let mut out = banner(&format!("Teams ({})", league.len()));
    out.push('\n');
    if league.is_empty() {
        out.push_str("No teams recorded.\n");
        return out;
    }
    for (index, team) in league.teams().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}\t{} / {}",
            team_line(index + 1, team),
            team.conference,
            team.division
        );
    }
    out
}

/// Every player in roster order.
pub fn player_list(db: &Database) -> String {
    let roster = db.roster();
    let mut out = banner(&format!("Players ({})", roster.len()));
    out.push('\n');
    if roster.is_empty() {
        out.push_str("No players recorded.\n");
        return out;
    }
    for (index, player) in roster.players().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. #{:<2} {:<width$}\t{:<6}\t{}{}",
            index + 1,
            player.number,
            player.name,
            player.kind().to_string(),
            team_label(player),
            if player.retired { "\t(retired)" } else { "" },
            width = NAME_WIDTH,
        );
    }
    out
}

/// A team's record and roster.
pub fn team_card(db: &Database, full_name: &str) -> Result<String> {
    let team = db.league().find(full_name)?;
    let name = team.full_name();
    let mut out = banner(&name);
    out.push('\n');
    let _ = writeln!(out, "Conference:\t{}", team.conference);
    let _ = writeln!(out, "Division:\t{}", team.division);
    let _ = writeln!(out, "Record:\t\t{} ({} GP)", team.record(), team.games_played());
    let _ = writeln!(out, "Points:\t\t{}", team.points());
    let _ = writeln!(out, "Points %:\t{:.3}", team.points_percentage());
    out.push('\n');
    out.push_str(&section_header("Roster"));
    out.push('\n');
    let mut roster: Vec<&Player> = db.roster().on_team(&name).collect();
    if roster.is_empty() {
        out.push_str("No players signed.\n");
        return Ok(out);
    }
    roster.sort_by_key(|player| player.number);
    for player in roster {
        let _ = writeln!(
            out,
            "#{:<2} {:<width$}\t{}{}",
            player.number,
            player.name,
            player.kind(),
            if player.retired { " (retired)" } else { "" },
            width = NAME_WIDTH,
        );
    }
    Ok(out)
}

/// A player's bio, every recorded season and career totals.
pub fn player_card(db: &Database, name: &str, today: NaiveDate) -> Result<String> {
    let player = db.roster().find(name)?;
    let mut out = banner(&player.name);
    out.push('\n');
    let _ = writeln!(out, "Position:\t{}", player.kind());
    let _ = writeln!(out, "Number:\t\t#{}", player.number);
    let _ = writeln!(
        out,
        "Born:\t\t{} (age {})",
        player.birthday.format("%Y-%m-%d"),
        player.age(today)
    );
    let _ = writeln!(out, "Team:\t\t{}", team_label(player));
    let _ = writeln!(
        out,
        "Status:\t\t{}",
        if player.retired { "Retired" } else { "Active" }
    );
    out.push('\n');
    out.push_str(&section_header("Seasons"));
    out.push('\n');
    if player.career.is_empty() {
        out.push_str("No seasons recorded.\n");
        return Ok(out);
    }
    match &player.career {
        Career::Skater(seasons) => {
            for season in seasons {
                let _ = writeln!(out, "{}\t{}", season.season, skater_stats(season));
            }
            if let Some(total) = player.skater_totals() {
                let _ = writeln!(out, "{}\t{}", total.season, skater_stats(&total));
            }
        }
        Career::Goalie(seasons) => {
            for season in seasons {
                let _ = writeln!(out, "{}\t{}", season.season, goalie_stats(season));
            }
            if let Some(total) = player.goalie_totals() {
                let _ = writeln!(out, "{}\t{}", total.season, goalie_stats(&total));
            }
        }
    }
    Ok(out)
}
