//! League, division, conference and wildcard standings.
//!
//! Every builder borrows the league and returns a fresh ordering; the
//! league's own order is never touched. Grouped reports hard-code the
//! 32-team, four-division layout and refuse to run on anything else.

use std::{cmp::Ordering, fmt};

use crate::{
    error::{Result, StatsError},
    league::{League, TEAMS_PER_CONFERENCE, TEAMS_PER_DIVISION},
    models::{Conference, Division, Team},
    report,
};

/// Teams per division that qualify for the playoffs outright.
pub const DIVISION_QUALIFIERS: usize = 3;
/// Playoff spots left for the wildcard pool of each conference.
pub const WILDCARD_SPOTS: usize = 2;

/// Field a league-wide table is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsMetric {
    /// Standings points.
    Points,
    /// Regulation and overtime wins.
    Wins,
    /// Regulation losses.
    Losses,
    /// Overtime and shootout losses.
    OvertimeLosses,
}

impl StandingsMetric {
    /// Every metric, in menu order.
    pub const ALL: [StandingsMetric; 4] = [
        StandingsMetric::Points,
        StandingsMetric::Wins,
        StandingsMetric::Losses,
        StandingsMetric::OvertimeLosses,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            StandingsMetric::Points => "Points",
            StandingsMetric::Wins => "Wins",
            StandingsMetric::Losses => "Losses",
            StandingsMetric::OvertimeLosses => "Overtime Losses",
        }
    }

    fn value(self, team: &Team) -> u32 {
        match self {
            StandingsMetric::Points => team.points(),
            StandingsMetric::Wins => team.wins,
            StandingsMetric::Losses => team.losses,
            StandingsMetric::OvertimeLosses => team.overtime_losses,
        }
    }
}

/// Descending by the metric, then alphabetical by full name.
fn compare(metric: StandingsMetric, a: &Team, b: &Team) -> Ordering {
    metric
        .value(b)
        .cmp(&metric.value(a))
        .then_with(|| a.full_name().cmp(&b.full_name()))
}

fn sort_by_metric(teams: &mut [&Team], metric: StandingsMetric) {
    teams.sort_by(|a, b| compare(metric, a, b));
}

/// A titled, ranked block of teams.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsSection<'a> {
    /// Header printed above the block.
    pub title: String,
    /// Teams in rank order.
    pub teams: Vec<&'a Team>,
    /// Number of teams above the playoff cut line, if the block has one.
    pub cut_line: Option<usize>,
}

impl<'a> StandingsSection<'a> {
    fn new(title: impl Into<String>, teams: Vec<&'a Team>) -> Self {
        Self {
            title: title.into(),
            teams,
            cut_line: None,
        }
    }

    /// Full names in rank order.
    pub fn names(&self) -> Vec<String> {
        self.teams.iter().map(|team| team.full_name()).collect()
    }
}

/// A complete standings report.
#[derive(Debug, Clone, PartialEq)]
pub struct Standings<'a> {
    /// Report title.
    pub title: String,
    /// Sections in print order.
    pub sections: Vec<StandingsSection<'a>>,
}

impl Standings<'_> {
    /// Find a section by its title.
    pub fn section(&self, title: &str) -> Option<&StandingsSection<'_>> {
        self.sections.iter().find(|section| section.title == title)
    }
}

impl fmt::Display for Standings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", report::banner(&self.title))?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", report::section_header(&section.title))?;
            for (index, team) in section.teams.iter().enumerate() {
                if section.cut_line == Some(index) {
                    writeln!(f, "{}", report::CUT_LINE)?;
                }
                writeln!(f, "{}", report::team_line(index + 1, team))?;
            }
        }
        Ok(())
    }
}

/// Whole league ranked by one metric.
pub fn league_standings(league: &League, metric: StandingsMetric) -> Result<Standings<'_>> {
    if league.is_empty() {
        return Err(StatsError::NoTeams);
    }
    let mut teams: Vec<&Team> = league.teams().iter().collect();
    sort_by_metric(&mut teams, metric);
    Ok(Standings {
        title: format!("League Standings by {}", metric.label()),
        sections: vec![StandingsSection::new("League", teams)],
    })
}

/// Four divisions of eight, each ranked by points.
pub fn division_standings(league: &League) -> Result<Standings<'_>> {
    check_grouping(league)?;
    let sections = Division::ALL
        .into_iter()
        .map(|division| {
            let mut teams = division_bucket(league, division);
            sort_by_metric(&mut teams, StandingsMetric::Points);
            StandingsSection::new(division.name(), teams)
        })
        .collect();
    Ok(Standings {
        title: "Division Standings".to_string(),
        sections,
    })
}

/// Two conferences of sixteen, each ranked by points.
pub fn conference_standings(league: &League) -> Result<Standings<'_>> {
    check_grouping(league)?;
    let sections = Conference::ALL
        .into_iter()
        .map(|conference| {
            let mut teams = conference_bucket(league, conference);
            sort_by_metric(&mut teams, StandingsMetric::Points);
            StandingsSection::new(conference.name(), teams)
        })
        .collect();
    Ok(Standings {
        title: "Conference Standings".to_string(),
        sections,
    })
}

/// Division top threes plus a points-ranked wildcard pool per conference.
pub fn wildcard_standings(league: &League) -> Result<Standings<'_>> {
    check_grouping(league)?;
    let mut sections = Vec::with_capacity(Conference::ALL.len() * 3);
    for conference in Conference::ALL {
        sections.extend(conference_wildcard(league, conference));
    }
    Ok(Standings {
        title: "Wildcard Standings".to_string(),
        sections,
    })
}

fn conference_wildcard(league: &League, conference: Conference) -> [StandingsSection<'_>; 3] {
    let [first, second] = conference.divisions();

    let mut order = division_bucket(league, first);
    sort_by_metric(&mut order, StandingsMetric::Points);
    let mut second_bucket = division_bucket(league, second);
    sort_by_metric(&mut second_bucket, StandingsMetric::Points);
    order.extend(second_bucket);

    // Pull the second division's top three up behind the first division's.
    for offset in 0..DIVISION_QUALIFIERS {
        order.swap(DIVISION_QUALIFIERS + offset, TEAMS_PER_DIVISION + offset);
    }
    let qualifiers = 2 * DIVISION_QUALIFIERS;
    sort_by_metric(&mut order[qualifiers..], StandingsMetric::Points);

    let wildcard_pool = order.split_off(qualifiers);
    let second_top = order.split_off(DIVISION_QUALIFIERS);
    let mut wildcard = StandingsSection::new(format!("{} Wildcard", conference.name()), wildcard_pool);
    wildcard.cut_line = Some(WILDCARD_SPOTS);
    [
        StandingsSection::new(first.name(), order),
        StandingsSection::new(second.name(), second_top),
        wildcard,
    ]
}

fn division_bucket(league: &League, division: Division) -> Vec<&Team> {
    league
        .teams()
        .iter()
        .filter(|team| team.division == division)
        .collect()
}

fn conference_bucket(league: &League, conference: Conference) -> Vec<&Team> {
    league
        .teams()
        .iter()
        .filter(|team| team.conference == conference)
        .collect()
}

/// Grouped reports index into fixed positions; refuse anything but 4×8 / 2×16.
fn check_grouping(league: &League) -> Result<()> {
    if league.is_empty() {
        return Err(StatsError::NoTeams);
    }
    for division in Division::ALL {
        let found = division_bucket(league, division).len();
        if found != TEAMS_PER_DIVISION {
            return Err(StatsError::TeamsNotGrouped {
                group: division.name().to_string(),
                found,
                expected: TEAMS_PER_DIVISION,
            });
        }
    }
    for conference in Conference::ALL {
        let found = conference_bucket(league, conference).len();
        if found != TEAMS_PER_CONFERENCE {
            return Err(StatsError::TeamsNotGrouped {
                group: conference.name().to_string(),
                found,
                expected: TEAMS_PER_CONFERENCE,
            });
        }
    }
    // A team filed under the other conference's division leaves the
    // conference counts right but the wildcard split wrong.
    for division in Division::ALL {
        let misfiled = division_bucket(league, division)
            .iter()
            .filter(|team| team.conference != division.conference())
            .count();
        if misfiled > 0 {
            return Err(StatsError::TeamsNotGrouped {
                group: format!("{} {}", division.conference().name(), division.name()),
                found: TEAMS_PER_DIVISION - misfiled,
                expected: TEAMS_PER_DIVISION,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Full league where every team's points are unique and descend with the
    /// insertion index inside each division.
    fn full_league() -> League {
        let mut league = League::new();
        for (d, division) in Division::ALL.into_iter().enumerate() {
            for slot in 0..TEAMS_PER_DIVISION {
                let wins = 60 - (slot as u32) * 4 - d as u32;
                let team = Team::new(
                    format!("{} {}", division.name(), slot + 1),
                    "Club",
                    division.conference(),
                    division,
                )
                .with_record(wins, 82 - wins, 0);
                league.add_team(team).unwrap();
            }
        }
        league
    }

    fn record(league: &mut League, name: &str, wins: u32, losses: u32) {
        league.set_record(name, wins, losses, 0).unwrap();
    }

    #[test]
    fn empty_league_has_no_standings() {
        let league = League::new();
        assert_eq!(
            league_standings(&league, StandingsMetric::Points),
            Err(StatsError::NoTeams)
        );
        assert_eq!(division_standings(&league), Err(StatsError::NoTeams));
        assert_eq!(wildcard_standings(&league), Err(StatsError::NoTeams));
    }

    #[test]
    fn league_ranking_is_non_increasing() {
        let league = full_league();
        for metric in StandingsMetric::ALL {
            let standings = league_standings(&league, metric).unwrap();
            let teams = &standings.sections[0].teams;
            assert_eq!(teams.len(), 32);
            assert!(teams
                .windows(2)
                .all(|pair| metric.value(pair[0]) >= metric.value(pair[1])));
        }
    }

    #[test]
    fn ties_break_alphabetically() {
        let mut league = League::new();
        for city in ["Vancouver", "Calgary", "Edmonton"] {
            league
                .add_team(
                    Team::new(city, "Club", Conference::Western, Division::Pacific)
                        .with_record(40, 30, 12),
                )
                .unwrap();
        }
        let standings = league_standings(&league, StandingsMetric::Points).unwrap();
        assert_eq!(
            standings.sections[0].names(),
            vec!["Calgary Club", "Edmonton Club", "Vancouver Club"]
        );
    }

    #[test]
    fn reports_leave_league_order_untouched() {
        let league = full_league();
        let before: Vec<String> = league.teams().iter().map(Team::full_name).collect();
        let _ = league_standings(&league, StandingsMetric::Losses).unwrap();
        let _ = wildcard_standings(&league).unwrap();
        let after: Vec<String> = league.teams().iter().map(Team::full_name).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn divisions_need_exactly_eight_teams() {
        let mut league = full_league();
        league.set_division("Atlantic 8 Club", Division::Metropolitan).unwrap();
        league.set_conference("Atlantic 8 Club", Conference::Eastern).unwrap();
        assert_eq!(
            division_standings(&league),
            Err(StatsError::TeamsNotGrouped {
                group: "Atlantic".to_string(),
                found: 7,
                expected: 8,
            })
        );
        assert!(conference_standings(&league).is_err());
        assert!(wildcard_standings(&league).is_err());
    }

    #[test]
    fn conferences_need_exactly_sixteen_teams() {
        let mut league = full_league();
        league.set_conference("Central 1 Club", Conference::Eastern).unwrap();
        assert_eq!(
            conference_standings(&league),
            Err(StatsError::TeamsNotGrouped {
                group: "Eastern".to_string(),
                found: 17,
                expected: 16,
            })
        );
    }

    #[test]
    fn division_sections_are_sorted_by_points() {
        let mut league = full_league();
        record(&mut league, "Pacific 8 Club", 70, 12);
        let standings = division_standings(&league).unwrap();
        let titles: Vec<&str> = standings.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Atlantic", "Metropolitan", "Central", "Pacific"]);
        let pacific = standings.section("Pacific").unwrap();
        assert_eq!(pacific.teams.len(), 8);
        assert_eq!(pacific.teams[0].full_name(), "Pacific 8 Club");
    }

    #[test]
    fn wildcard_promotes_division_leaders() {
        let mut league = full_league();
        // Atlantic 4 climbs to second; Atlantic 3 falls into the wildcard pool.
        record(&mut league, "Atlantic 4 Club", 57, 25);
        record(&mut league, "Atlantic 1 Club", 58, 24);

        let standings = wildcard_standings(&league).unwrap();
        let titles: Vec<&str> = standings.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Atlantic",
                "Metropolitan",
                "Eastern Wildcard",
                "Central",
                "Pacific",
                "Western Wildcard"
            ]
        );

        let atlantic = standings.section("Atlantic").unwrap();
        let metro = standings.section("Metropolitan").unwrap();
        let wildcard = standings.section("Eastern Wildcard").unwrap();
        assert_eq!(atlantic.names(), ["Atlantic 1 Club", "Atlantic 4 Club", "Atlantic 2 Club"]);
        assert_eq!(metro.names(), ["Metropolitan 1 Club", "Metropolitan 2 Club", "Metropolitan 3 Club"]);
        assert_eq!(wildcard.teams.len(), 10);
        assert_eq!(wildcard.cut_line, Some(WILDCARD_SPOTS));
        assert_eq!(wildcard.teams[0].full_name(), "Atlantic 3 Club");
        assert!(wildcard
            .teams
            .windows(2)
            .all(|pair| pair[0].points() >= pair[1].points()));
    }

    #[test]
    fn wildcard_leader_outranks_higher_scoring_wildcard_team() {
        let mut league = full_league();
        record(&mut league, "Metropolitan 1 Club", 30, 52);
        for slot in 2..=8 {
            record(&mut league, &format!("Metropolitan {slot} Club"), 29 - slot, 53 + slot);
        }
        let standings = wildcard_standings(&league).unwrap();
        let metro = standings.section("Metropolitan").unwrap();
        let wildcard = standings.section("Eastern Wildcard").unwrap();

        let leader = metro.teams[0];
        assert_eq!(leader.full_name(), "Metropolitan 1 Club");
        assert!(wildcard.teams[0].points() > leader.points());
        assert!(wildcard
            .teams
            .iter()
            .all(|team| team.division == Division::Atlantic || team.points() <= leader.points()));
    }

    #[test]
    fn rendered_report_has_sections_and_ranks() {
        let league = full_league();
        let text = wildcard_standings(&league).unwrap().to_string();
        assert!(text.contains("**** Atlantic ****"));
        assert!(text.contains("**** Western Wildcard ****"));
        assert!(text.contains(report::CUT_LINE));
        assert!(text.contains(" 1. Atlantic 1 Club"));
        assert!(text.contains("60-22-0"));
    }
}
