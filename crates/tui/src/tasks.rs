//! Menu tasks: the prompts each one asks and what it does with the answers.

use chrono::NaiveDate;
use nhlstats_core::{
    conference_standings, division_standings, goalie_leaders, league_standings, report,
    skater_leaders, wildcard_standings, Database, GoalieSeason, GoalieStat, Player, SkaterSeason,
    SkaterStat, StandingsMetric, StatsError, Team,
};

use crate::prompt::{Answers, Field, FieldKind};

const TEAM: Field = Field::new("team", "Team (full name, e.g. Boston Bruins)", FieldKind::Team);
const PLAYER: Field = Field::new("player", "Player name", FieldKind::Player);
const SKATER: Field = Field::new("player", "Skater name", FieldKind::Skater);
const GOALIE: Field = Field::new("player", "Goalie name", FieldKind::Goalie);
const TEAM_FILTER: Field = Field::new(
    "team",
    "Limit to team (full name, blank for the whole league)",
    FieldKind::OptionalTeam,
);

/// Work started from a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ListTeams,
    ViewTeam,
    AddTeam,
    ChangeCity,
    ChangeTeamName,
    ChangeConference,
    ChangeDivision,
    UpdateRecord,
    RemoveTeam,
    ListPlayers,
    ViewPlayer,
    AddSkater,
    AddGoalie,
    RenamePlayer,
    ChangeBirthday,
    ChangeNumber,
    SignPlayer,
    ReleasePlayer,
    ToggleRetired,
    RemovePlayer,
    AddSkaterSeason,
    AddGoalieSeason,
    UpdateSkaterSeason,
    UpdateGoalieSeason,
    RemoveSeason,
    LeagueStandings(StandingsMetric),
    DivisionStandings,
    ConferenceStandings,
    WildcardStandings,
    SkaterLeaders(SkaterStat),
    GoalieLeaders(GoalieStat),
}

/// What a finished task shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One line for the status bar.
    Message(String),
    /// A scrollable text report.
    Report {
        /// Viewer title.
        title: String,
        /// Report text.
        body: String,
    },
}

impl Task {
    /// Menu label.
    pub fn title(self) -> String {
        match self {
            Task::ListTeams => "List teams".into(),
            Task::ViewTeam => "View team".into(),
            Task::AddTeam => "Add team".into(),
            Task::ChangeCity => "Change team city".into(),
            Task::ChangeTeamName => "Change team name".into(),
            Task::ChangeConference => "Change team conference".into(),
            Task::ChangeDivision => "Change team division".into(),
            Task::UpdateRecord => "Update team record".into(),
            Task::RemoveTeam => "Remove team".into(),
            Task::ListPlayers => "List players".into(),
            Task::ViewPlayer => "View player".into(),
            Task::AddSkater => "Add skater".into(),
            Task::AddGoalie => "Add goalie".into(),
            Task::RenamePlayer => "Rename player".into(),
            Task::ChangeBirthday => "Change birthday".into(),
            Task::ChangeNumber => "Change jersey number".into(),
            Task::SignPlayer => "Sign player with team".into(),
            Task::ReleasePlayer => "Release player to free agency".into(),
            Task::ToggleRetired => "Retire / un-retire player".into(),
            Task::RemovePlayer => "Remove player".into(),
            Task::AddSkaterSeason => "Add skater season".into(),
            Task::AddGoalieSeason => "Add goalie season".into(),
            Task::UpdateSkaterSeason => "Update skater season".into(),
            Task::UpdateGoalieSeason => "Update goalie season".into(),
            Task::RemoveSeason => "Remove season".into(),
            Task::LeagueStandings(metric) => format!("League standings by {}", metric.label()),
            Task::DivisionStandings => "Division standings".into(),
            Task::ConferenceStandings => "Conference standings".into(),
            Task::WildcardStandings => "Wildcard standings".into(),
            Task::SkaterLeaders(stat) => format!("Skater leaders: {}", stat.label()),
            Task::GoalieLeaders(stat) => format!("Goalie leaders: {}", stat.label()),
        }
    }

    /// Whether a successful run changes the database.
    pub fn mutates(self) -> bool {
        !matches!(
            self,
            Task::ListTeams
                | Task::ViewTeam
                | Task::ListPlayers
                | Task::ViewPlayer
                | Task::LeagueStandings(_)
                | Task::DivisionStandings
                | Task::ConferenceStandings
                | Task::WildcardStandings
                | Task::SkaterLeaders(_)
                | Task::GoalieLeaders(_)
        )
    }

    /// Prompts asked before the task runs, in order.
    pub fn fields(self) -> Vec<Field> {
        use FieldKind::*;
        match self {
            Task::ListTeams
            | Task::ListPlayers
            | Task::LeagueStandings(_)
            | Task::DivisionStandings
            | Task::ConferenceStandings
            | Task::WildcardStandings => Vec::new(),
            Task::ViewTeam => vec![TEAM],
            Task::AddTeam => vec![
                Field::new("city", "City", Text),
                Field::new("name", "Team name", Text),
                Field::new("conference", "Conference (Eastern/Western)", Conference),
                Field::new(
                    "division",
                    "Division (Atlantic/Metropolitan/Central/Pacific)",
                    Division,
                ),
            ],
            Task::ChangeCity => vec![TEAM, Field::new("city", "New city", Text)],
            Task::ChangeTeamName => vec![TEAM, Field::new("name", "New team name", Text)],
            Task::ChangeConference => vec![
                TEAM,
                Field::new("conference", "New conference (Eastern/Western)", Conference),
            ],
            Task::ChangeDivision => vec![
                TEAM,
                Field::new(
                    "division",
                    "New division (Atlantic/Metropolitan/Central/Pacific)",
                    Division,
                ),
            ],
            Task::UpdateRecord => vec![
                TEAM,
                Field::new("wins", "Wins", Count),
                Field::new("losses", "Losses", Count),
                Field::new("overtime_losses", "Overtime losses", Count),
            ],
            Task::RemoveTeam => vec![
                TEAM,
                Field::new("confirm", "Remove this team and release its players? (y/n)", Confirm),
            ],
            Task::ViewPlayer => vec![PLAYER],
            Task::AddSkater | Task::AddGoalie => vec![
                Field::new("name", "Name", Text),
                Field::new("birthday", "Birthday (YYYY-MM-DD)", Date),
                Field::new("number", "Jersey number (0-99)", Jersey),
                Field::new(
                    "team",
                    "Team (full name, blank for free agent)",
                    OptionalTeam,
                ),
            ],
            Task::RenamePlayer => vec![PLAYER, Field::new("name", "New name", Text)],
            Task::ChangeBirthday => {
                vec![PLAYER, Field::new("birthday", "New birthday (YYYY-MM-DD)", Date)]
            }
            Task::ChangeNumber => {
                vec![PLAYER, Field::new("number", "New jersey number (0-99)", Jersey)]
            }
            Task::SignPlayer => vec![PLAYER, TEAM],
            Task::ReleasePlayer | Task::ToggleRetired => vec![PLAYER],
            Task::RemovePlayer => vec![
                PLAYER,
                Field::new("confirm", "Remove this player and every season? (y/n)", Confirm),
            ],
            Task::AddSkaterSeason => {
                let mut fields = vec![SKATER, Field::new("season", "Season (YYYY-YY)", SeasonLabel)];
                fields.extend(skater_stat_fields());
                fields
            }
            Task::UpdateSkaterSeason => {
                let mut fields = vec![
                    SKATER,
                    Field::new("season", "Season to update (YYYY-YY)", ExistingSeason { player: "player" }),
                ];
                fields.extend(skater_stat_fields());
                fields
            }
            Task::AddGoalieSeason => {
                let mut fields = vec![GOALIE, Field::new("season", "Season (YYYY-YY)", SeasonLabel)];
                fields.extend(goalie_stat_fields());
                fields
            }
            Task::UpdateGoalieSeason => {
                let mut fields = vec![
                    GOALIE,
                    Field::new("season", "Season to update (YYYY-YY)", ExistingSeason { player: "player" }),
                ];
                fields.extend(goalie_stat_fields());
                fields
            }
            Task::RemoveSeason => vec![
                PLAYER,
                Field::new("season", "Season to remove (YYYY-YY)", ExistingSeason { player: "player" }),
            ],
            Task::SkaterLeaders(_) | Task::GoalieLeaders(_) => vec![TEAM_FILTER],
        }
    }

    /// Apply the task to the database.
    pub fn run(
        self,
        db: &mut Database,
        answers: &Answers,
        today: NaiveDate,
    ) -> Result<Outcome, StatsError> {
        let outcome = match self {
            Task::ListTeams => show(self, report::team_list(db)),
            Task::ViewTeam => show(self, report::team_card(db, answers.text("team")?)?),
            Task::AddTeam => {
                let conference = answers.conference("conference")?;
                let division = answers.division("division")?;
                if division.conference() != conference {
                    return Err(StatsError::invalid(
                        "division",
                        format!("the {division} division is in the {} conference", division.conference()),
                    ));
                }
                let team = Team::new(answers.text("city")?, answers.text("name")?, conference, division);
                let name = team.full_name();
                db.league_mut().add_team(team)?;
                message(format!("Added {name} to the {division} division"))
            }
            Task::ChangeCity => {
                let team = answers.text("team")?;
                let renamed = db.rename_team_city(team, answers.text("city")?)?;
                message(format!("{team} is now the {renamed}"))
            }
            Task::ChangeTeamName => {
                let team = answers.text("team")?;
                let renamed = db.rename_team(team, answers.text("name")?)?;
                message(format!("{team} is now the {renamed}"))
            }
            Task::ChangeConference => {
                let team = answers.text("team")?;
                let conference = answers.conference("conference")?;
                db.league_mut().set_conference(team, conference)?;
                let division = db.league().find(team)?.division;
                if division.conference() == conference {
                    message(format!("{team} moved to the {conference} conference"))
                } else {
                    message(format!(
                        "{team} moved to the {conference} conference; its {division} division belongs to the {}",
                        division.conference()
                    ))
                }
            }
            Task::ChangeDivision => {
                let team = answers.text("team")?;
                let division = answers.division("division")?;
                let league = db.league_mut();
                league.set_division(team, division)?;
                league.set_conference(team, division.conference())?;
                message(format!(
                    "{team} moved to the {division} division ({} conference)",
                    division.conference()
                ))
            }
            Task::UpdateRecord => {
                let team = answers.text("team")?;
                db.league_mut().set_record(
                    team,
                    answers.count("wins")?,
                    answers.count("losses")?,
                    answers.count("overtime_losses")?,
                )?;
                let team = db.league().find(team)?;
                message(format!(
                    "{} record is now {} ({} points)",
                    team.full_name(),
                    team.record(),
                    team.points()
                ))
            }
            Task::RemoveTeam => {
                let team = answers.text("team")?;
                if !answers.flag("confirm")? {
                    return Ok(message(format!("Kept {team}")));
                }
                let released = db.remove_team(team)?;
                message(format!("Removed {team}; {released} player(s) released"))
            }
            Task::ListPlayers => show(self, report::player_list(db)),
            Task::ViewPlayer => show(self, report::player_card(db, answers.text("player")?, today)?),
            Task::AddSkater | Task::AddGoalie => {
                let name = answers.text("name")?;
                let birthday = answers.date("birthday")?;
                let number = answers.jersey("number")?;
                let mut player = if self == Task::AddSkater {
                    Player::skater(name, birthday, number)
                } else {
                    Player::goalie(name, birthday, number)
                };
                if let Some(team) = answers.optional_text("team")? {
                    player = player.on_team(team);
                }
                let kind = player.kind();
                db.add_player(player)?;
                message(format!("Added {kind} {name}"))
            }
            Task::RenamePlayer => {
                let player = answers.text("player")?;
                let name = answers.text("name")?;
                db.roster_mut().rename(player, name)?;
                message(format!("{player} is now {name}"))
            }
            Task::ChangeBirthday => {
                let player = answers.text("player")?;
                let birthday = answers.date("birthday")?;
                db.roster_mut().set_birthday(player, birthday)?;
                message(format!("{player} born {}", birthday.format("%Y-%m-%d")))
            }
            Task::ChangeNumber => {
                let player = answers.text("player")?;
                let number = answers.jersey("number")?;
                db.roster_mut().set_number(player, number)?;
                message(format!("{player} now wears #{number}"))
            }
            Task::SignPlayer => {
                let player = answers.text("player")?;
                let team = answers.text("team")?;
                db.sign_player(player, team)?;
                message(format!("{player} signed with the {team}"))
            }
            Task::ReleasePlayer => {
                let player = answers.text("player")?;
                db.release_player(player)?;
                message(format!("{player} is now a free agent"))
            }
            Task::ToggleRetired => {
                let player = answers.text("player")?;
                let retired = !db.roster().find(player)?.retired;
                db.roster_mut().set_retired(player, retired)?;
                if retired {
                    message(format!("{player} retired"))
                } else {
                    message(format!("{player} is active again"))
                }
            }
            Task::RemovePlayer => {
                let player = answers.text("player")?;
                if !answers.flag("confirm")? {
                    return Ok(message(format!("Kept {player}")));
                }
                db.roster_mut().remove_player(player)?;
                message(format!("Removed {player}"))
            }
            Task::AddSkaterSeason | Task::UpdateSkaterSeason => {
                let player = answers.text("player")?;
                let season = skater_season(answers)?;
                let label = season.season.clone();
                if self == Task::AddSkaterSeason {
                    db.roster_mut().add_skater_season(player, season)?;
                    message(format!("Added {label} for {player}"))
                } else {
                    db.roster_mut().update_skater_season(player, season)?;
                    message(format!("Updated {label} for {player}"))
                }
            }
            Task::AddGoalieSeason | Task::UpdateGoalieSeason => {
                let player = answers.text("player")?;
                let season = goalie_season(answers)?;
                let label = season.season.clone();
                if self == Task::AddGoalieSeason {
                    db.roster_mut().add_goalie_season(player, season)?;
                    message(format!("Added {label} for {player}"))
                } else {
                    db.roster_mut().update_goalie_season(player, season)?;
                    message(format!("Updated {label} for {player}"))
                }
            }
            Task::RemoveSeason => {
                let player = answers.text("player")?;
                let season = answers.text("season")?;
                db.roster_mut().remove_season(player, season)?;
                message(format!("Removed {season} from {player}"))
            }
            Task::LeagueStandings(metric) => {
                let standings = league_standings(db.league(), metric)?;
                show(self, standings.to_string())
            }
            Task::DivisionStandings => show(self, division_standings(db.league())?.to_string()),
            Task::ConferenceStandings => {
                show(self, conference_standings(db.league())?.to_string())
            }
            Task::WildcardStandings => show(self, wildcard_standings(db.league())?.to_string()),
            Task::SkaterLeaders(stat) => {
                let team = answers.optional_text("team")?;
                show(self, skater_leaders(db.roster(), stat, team).to_string())
            }
            Task::GoalieLeaders(stat) => {
                let team = answers.optional_text("team")?;
                show(self, goalie_leaders(db.roster(), stat, team).to_string())
            }
        };
        Ok(outcome)
    }
}

fn message(text: String) -> Outcome {
    Outcome::Message(text)
}

fn show(task: Task, body: String) -> Outcome {
    Outcome::Report {
        title: task.title(),
        body,
    }
}

fn skater_stat_fields() -> [Field; 4] {
    [
        Field::new("games_played", "Games played", FieldKind::Count),
        Field::new("goals", "Goals", FieldKind::Count),
        Field::new("assists", "Assists", FieldKind::Count),
        Field::new("plus_minus", "Plus-minus", FieldKind::SignedCount),
    ]
}

fn goalie_stat_fields() -> [Field; 6] {
    [
        Field::new("games_played", "Games played", FieldKind::Count),
        Field::new("wins", "Wins", FieldKind::Count),
        Field::new("losses", "Losses", FieldKind::Count),
        Field::new("overtime_losses", "Overtime losses", FieldKind::Count),
        Field::new("save_percentage", "Save percentage (e.g. 0.915)", FieldKind::Ratio),
        Field::new("gaa", "Goals-against average (e.g. 2.45)", FieldKind::Average),
    ]
}

fn skater_season(answers: &Answers) -> Result<SkaterSeason, StatsError> {
    Ok(SkaterSeason {
        season: answers.text("season")?.to_string(),
        games_played: answers.count("games_played")?,
        goals: answers.count("goals")?,
        assists: answers.count("assists")?,
        plus_minus: answers.signed("plus_minus")?,
    })
}

fn goalie_season(answers: &Answers) -> Result<GoalieSeason, StatsError> {
    Ok(GoalieSeason {
        season: answers.text("season")?.to_string(),
        games_played: answers.count("games_played")?,
        wins: answers.count("wins")?,
        losses: answers.count("losses")?,
        overtime_losses: answers.count("overtime_losses")?,
        save_percentage: answers.decimal("save_percentage")?,
        goals_against_average: answers.decimal("gaa")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Answer;
    use nhlstats_core::{Conference, Division};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()
    }

    fn text(value: &str) -> Answer {
        Answer::Text(value.to_string())
    }

    fn database() -> Database {
        let mut db = Database::new();
        db.league_mut()
            .add_team(Team::new("Florida", "Panthers", Conference::Eastern, Division::Atlantic))
            .unwrap();
        db
    }

    #[test]
    fn add_team_checks_division_belongs_to_conference() {
        let mut db = Database::new();
        let answers = Answers::new()
            .with("city", text("Toronto"))
            .with("name", text("Maple Leafs"))
            .with("conference", Answer::Conference(Conference::Western))
            .with("division", Answer::Division(Division::Atlantic));
        assert!(Task::AddTeam.run(&mut db, &answers, today()).is_err());
        assert!(db.league().is_empty());

        let answers = Answers::new()
            .with("city", text("Toronto"))
            .with("name", text("Maple Leafs"))
            .with("conference", Answer::Conference(Conference::Eastern))
            .with("division", Answer::Division(Division::Atlantic));
        let outcome = Task::AddTeam.run(&mut db, &answers, today()).unwrap();
        assert_eq!(
            outcome,
            Outcome::Message("Added Toronto Maple Leafs to the Atlantic division".into())
        );
    }

    #[test]
    fn changing_division_follows_its_conference() {
        let mut db = database();
        let answers = Answers::new()
            .with("team", text("Florida Panthers"))
            .with("division", Answer::Division(Division::Central));
        Task::ChangeDivision.run(&mut db, &answers, today()).unwrap();
        let team = db.league().find("Florida Panthers").unwrap();
        assert_eq!(team.division, Division::Central);
        assert_eq!(team.conference, Conference::Western);
    }

    #[test]
    fn player_and_season_lifecycle() {
        let mut db = database();
        let player = Answers::new()
            .with("name", text("Sam Reinhart"))
            .with("birthday", Answer::Date(NaiveDate::from_ymd_opt(1995, 11, 6).unwrap()))
            .with("number", Answer::Jersey(13))
            .with("team", text("Florida Panthers"));
        Task::AddSkater.run(&mut db, &player, today()).unwrap();

        let season = Answers::new()
            .with("player", text("Sam Reinhart"))
            .with("season", text("2023-24"))
            .with("games_played", Answer::Count(82))
            .with("goals", Answer::Count(57))
            .with("assists", Answer::Count(37))
            .with("plus_minus", Answer::Signed(19));
        Task::AddSkaterSeason.run(&mut db, &season, today()).unwrap();
        assert_eq!(
            Task::AddSkaterSeason.run(&mut db, &season, today()),
            Err(StatsError::DuplicateSeason {
                player: "Sam Reinhart".into(),
                season: "2023-24".into()
            })
        );

        let Outcome::Report { body, .. } = Task::ViewPlayer
            .run(&mut db, &Answers::new().with("player", text("Sam Reinhart")), today())
            .unwrap()
        else {
            panic!("expected a report");
        };
        assert!(body.contains("P:  94"));
        assert!(body.contains("(age 28)"));

        let remove = Answers::new()
            .with("player", text("Sam Reinhart"))
            .with("season", text("2023-24"));
        Task::RemoveSeason.run(&mut db, &remove, today()).unwrap();
        assert!(db.roster().find("Sam Reinhart").unwrap().career.is_empty());
    }

    #[test]
    fn declined_removal_keeps_the_team() {
        let mut db = database();
        let answers = Answers::new()
            .with("team", text("Florida Panthers"))
            .with("confirm", Answer::Flag(false));
        assert_eq!(
            Task::RemoveTeam.run(&mut db, &answers, today()),
            Ok(Outcome::Message("Kept Florida Panthers".into()))
        );
        assert_eq!(db.league().len(), 1);
    }

    #[test]
    fn grouped_reports_need_a_full_league() {
        let mut db = database();
        assert!(matches!(
            Task::DivisionStandings.run(&mut db, &Answers::new(), today()),
            Err(StatsError::TeamsNotGrouped { .. })
        ));
        let outcome = Task::LeagueStandings(StandingsMetric::Points)
            .run(&mut db, &Answers::new(), today())
            .unwrap();
        assert!(matches!(outcome, Outcome::Report { .. }));
        assert!(matches!(
            Task::WildcardStandings.run(&mut Database::new(), &Answers::new(), today()),
            Err(StatsError::NoTeams)
        ));
    }

    #[test]
    fn field_keys_are_unique() {
        for task in [Task::AddGoalieSeason, Task::UpdateSkaterSeason, Task::AddTeam] {
            let keys: Vec<&str> = task.fields().iter().map(|field| field.key).collect();
            let mut unique = keys.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(keys.len(), unique.len(), "{task:?} repeats a key");
        }
        assert!(!Task::ListTeams.mutates());
        assert!(Task::ToggleRetired.mutates());
    }
}
