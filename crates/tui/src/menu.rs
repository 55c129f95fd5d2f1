//! Numbered menus and menu-choice parsing.

use nhlstats_core::{GoalieStat, SkaterStat, StandingsMetric};

use crate::tasks::Task;

/// A screen of numbered options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Main,
    Teams,
    Players,
    Seasons,
    Standings,
    Leaders,
}

/// What picking a menu option does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open(Menu),
    Run(Task),
}

/// A parsed menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Back,
    /// Zero-based option index.
    Option(usize),
}

impl Menu {
    pub fn title(self) -> &'static str {
        match self {
            Menu::Main => "Main Menu",
            Menu::Teams => "Teams",
            Menu::Players => "Players",
            Menu::Seasons => "Player Seasons",
            Menu::Standings => "Standings",
            Menu::Leaders => "Leaders",
        }
    }

    /// Menu that `0` returns to; the main menu has none.
    pub fn parent(self) -> Option<Menu> {
        match self {
            Menu::Main => None,
            _ => Some(Menu::Main),
        }
    }

    /// Menus whose tasks change the database.
    pub fn edits(self) -> bool {
        matches!(self, Menu::Teams | Menu::Players | Menu::Seasons)
    }

    pub fn entries(self) -> Vec<(String, MenuAction)> {
        let open = |menu: Menu| (menu.title().to_string(), MenuAction::Open(menu));
        let run = |task: Task| (task.title(), MenuAction::Run(task));
        match self {
            Menu::Main => vec![
                open(Menu::Teams),
                open(Menu::Players),
                open(Menu::Seasons),
                open(Menu::Standings),
                open(Menu::Leaders),
            ],
            Menu::Teams => [
                Task::ListTeams,
                Task::ViewTeam,
                Task::AddTeam,
                Task::ChangeCity,
                Task::ChangeTeamName,
                Task::ChangeConference,
                Task::ChangeDivision,
                Task::UpdateRecord,
                Task::RemoveTeam,
            ]
            .into_iter()
            .map(run)
            .collect(),
            Menu::Players => [
                Task::ListPlayers,
                Task::ViewPlayer,
                Task::AddSkater,
                Task::AddGoalie,
                Task::RenamePlayer,
                Task::ChangeBirthday,
                Task::ChangeNumber,
                Task::SignPlayer,
                Task::ReleasePlayer,
                Task::ToggleRetired,
                Task::RemovePlayer,
            ]
            .into_iter()
            .map(run)
            .collect(),
            Menu::Seasons => [
                Task::AddSkaterSeason,
                Task::AddGoalieSeason,
                Task::UpdateSkaterSeason,
                Task::UpdateGoalieSeason,
                Task::RemoveSeason,
            ]
            .into_iter()
            .map(run)
            .collect(),
            Menu::Standings => StandingsMetric::ALL
                .into_iter()
                .map(Task::LeagueStandings)
                .chain([
                    Task::DivisionStandings,
                    Task::ConferenceStandings,
                    Task::WildcardStandings,
                ])
                .map(run)
                .collect(),
            Menu::Leaders => SkaterStat::ALL
                .into_iter()
                .map(Task::SkaterLeaders)
                .chain(GoalieStat::ALL.into_iter().map(Task::GoalieLeaders))
                .map(run)
                .collect(),
        }
    }

    /// Numbered option lines, with the back and quit entries.
    pub fn lines(self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .entries()
            .iter()
            .enumerate()
            .map(|(index, (label, _))| format!("{:>2}. {label}", index + 1))
            .collect();
        if let Some(parent) = self.parent() {
            lines.push(format!(" 0. Back to {}", parent.title()));
        }
        lines.push(" Q. Quit".to_string());
        lines
    }
}

/// Parse a menu choice among `count` options.
pub fn parse_choice(input: &str, count: usize, allow_back: bool) -> Result<Selection, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }
    let lowest = if allow_back { 0 } else { 1 };
    let range = || format!("Enter a number from {lowest} to {count}, or Q to quit");
    match input.parse::<usize>() {
        Ok(0) if allow_back => Ok(Selection::Back),
        Ok(choice) if (1..=count).contains(&choice) => Ok(Selection::Option(choice - 1)),
        _ => Err(range()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_case_insensitive() {
        assert_eq!(parse_choice("q", 5, false), Ok(Selection::Quit));
        assert_eq!(parse_choice(" Q ", 5, true), Ok(Selection::Quit));
    }

    #[test]
    fn zero_only_goes_back_in_submenus() {
        assert_eq!(parse_choice("0", 9, true), Ok(Selection::Back));
        assert_eq!(
            parse_choice("0", 5, false),
            Err("Enter a number from 1 to 5, or Q to quit".to_string())
        );
    }

    #[test]
    fn out_of_range_and_garbage_are_rejected() {
        assert_eq!(parse_choice("3", 5, false), Ok(Selection::Option(2)));
        assert!(parse_choice("6", 5, false).is_err());
        assert!(parse_choice("-1", 5, true).is_err());
        assert!(parse_choice("teams", 5, true).is_err());
        assert!(parse_choice("", 5, true).is_err());
    }

    #[test]
    fn menus_link_back_to_main() {
        assert_eq!(Menu::Main.entries().len(), 5);
        assert_eq!(Menu::Standings.entries().len(), 7);
        assert_eq!(Menu::Leaders.entries().len(), 7);
        assert_eq!(Menu::Teams.parent(), Some(Menu::Main));
        let lines = Menu::Seasons.lines();
        assert_eq!(lines.first().map(String::as_str), Some(" 1. Add skater season"));
        assert!(lines.contains(&" 0. Back to Main Menu".to_string()));
        assert!(!Menu::Main.lines().iter().any(|line| line.starts_with(" 0.")));
    }
}
