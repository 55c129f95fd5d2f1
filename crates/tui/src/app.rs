use std::{io, mem, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nhlstats_core::{AppConfig, Database, SaveManager};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::{
    menu::{parse_choice, Menu, MenuAction, Selection},
    prompt::{Answers, Check, Field},
    tasks::{Outcome, Task},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 64;
const PAGE_SIZE: u16 = 10;
const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Line editor for menu choices and prompt answers.
#[derive(Debug, Clone, Default)]
struct InputLine {
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl InputLine {
    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.buffer.len())
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.len() as isize) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn insert(&mut self, ch: char) {
        if self.len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        let index = self.byte_index();
        self.buffer.insert(index, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index();
            self.buffer.remove(index);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let index = self.byte_index();
            self.buffer.remove(index);
        }
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        mem::take(&mut self.buffer)
    }
}

#[derive(Debug, Clone)]
struct FormState {
    task: Task,
    fields: Vec<Field>,
    answers: Answers,
    return_to: Menu,
}

impl FormState {
    fn current(&self) -> Option<&Field> {
        self.fields.get(self.answers.len())
    }
}

#[derive(Debug, Clone)]
struct ReportView {
    title: String,
    lines: Vec<String>,
    scroll: u16,
    return_to: Menu,
}

impl ReportView {
    fn new(title: String, body: &str, return_to: Menu) -> Self {
        Self {
            title,
            lines: body.lines().map(expand_tabs).collect(),
            scroll: 0,
            return_to,
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.lines.len().saturating_sub(1) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }
}

#[derive(Debug, Clone)]
enum Screen {
    Menu(Menu),
    Form(FormState),
    Report(ReportView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

/// Application state for the stats keeper TUI.
pub struct NhlStatsApp {
    db: Database,
    saves: SaveManager,
    autosave: bool,
    today: NaiveDate,
    screen: Screen,
    input: InputLine,
    status: String,
    tone: Tone,
    dirty: bool,
    quit_armed: bool,
    should_quit: bool,
    theme: Theme,
}

impl NhlStatsApp {
    pub fn new(db: Database, saves: SaveManager, config: &AppConfig, status: String) -> Self {
        Self {
            db,
            saves,
            autosave: config.autosave,
            today: config.today(),
            screen: Screen::Menu(Menu::Main),
            input: InputLine::default(),
            status,
            tone: Tone::Info,
            dirty: false,
            quit_armed: false,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        info!("Exited cleanly");
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
                true
            }
            Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        if let Screen::Report(view) = &mut self.screen {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => view.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => view.scroll_by(1),
                KeyCode::PageUp => view.scroll_by(-i32::from(PAGE_SIZE)),
                KeyCode::PageDown | KeyCode::Char(' ') => view.scroll_by(i32::from(PAGE_SIZE)),
                KeyCode::Home => view.scroll = 0,
                KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('0') => {
                    let menu = view.return_to;
                    self.show_menu(menu);
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.escape(),
            KeyCode::Enter => {
                let line = self.input.take();
                self.submit_line(&line);
            }
            KeyCode::Left => self.input.move_cursor(-1),
            KeyCode::Right => self.input.move_cursor(1),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.input.insert(ch);
                }
            }
            _ => {}
        }
    }

    fn escape(&mut self) {
        self.input.take();
        match &self.screen {
            Screen::Menu(menu) => {
                let menu = *menu;
                if menu.parent().is_some() {
                    self.leave_menu(menu);
                }
            }
            Screen::Form(form) => {
                let (task, menu) = (form.task, form.return_to);
                self.show_menu(menu);
                self.set_status(Tone::Warning, format!("{} cancelled", task.title()));
            }
            Screen::Report(view) => {
                let menu = view.return_to;
                self.show_menu(menu);
            }
        }
    }

    /// Handle one submitted line of input on the current screen.
    fn submit_line(&mut self, line: &str) {
        match &self.screen {
            Screen::Menu(menu) => {
                let menu = *menu;
                self.choose(menu, line);
            }
            Screen::Form(_) => self.answer(line),
            Screen::Report(_) => {}
        }
    }

    fn choose(&mut self, menu: Menu, line: &str) {
        let entries = menu.entries();
        match parse_choice(line, entries.len(), menu.parent().is_some()) {
            Ok(Selection::Quit) => self.quit(),
            Ok(Selection::Back) => self.leave_menu(menu),
            Ok(Selection::Option(index)) => match entries.get(index).map(|(_, action)| *action) {
                Some(MenuAction::Open(next)) => {
                    self.show_menu(next);
                    self.set_status(Tone::Info, format!("{} menu", next.title()));
                }
                Some(MenuAction::Run(task)) => self.start_task(task, menu),
                None => {}
            },
            Err(message) => self.set_status(Tone::Warning, message),
        }
    }

    fn start_task(&mut self, task: Task, menu: Menu) {
        let fields = task.fields();
        if fields.is_empty() {
            self.execute(task, Answers::new(), menu);
            return;
        }
        self.screen = Screen::Form(FormState {
            task,
            fields,
            answers: Answers::new(),
            return_to: menu,
        });
        self.set_status(Tone::Info, format!("{}: Esc cancels, Q quits", task.title()));
    }

    fn answer(&mut self, line: &str) {
        if line.trim().eq_ignore_ascii_case("q") {
            self.quit();
            return;
        }
        let Screen::Form(form) = &mut self.screen else {
            return;
        };
        let Some(field) = form.current().cloned() else {
            return;
        };
        match field.check(line, &self.db, &form.answers) {
            Check::Accept(answer) => {
                form.answers.push(field.key, answer);
                if form.current().is_none() {
                    let (task, menu) = (form.task, form.return_to);
                    let answers = mem::take(&mut form.answers);
                    self.execute(task, answers, menu);
                } else {
                    self.status.clear();
                    self.tone = Tone::Info;
                }
            }
            Check::Retry(message) => {
                self.status = message;
                self.tone = Tone::Warning;
            }
            Check::Abort(message) => {
                let (task, menu) = (form.task, form.return_to);
                info!(task = %task.title(), %message, "Task aborted");
                self.show_menu(menu);
                self.set_status(Tone::Error, message);
            }
        }
    }

    fn execute(&mut self, task: Task, answers: Answers, menu: Menu) {
        match task.run(&mut self.db, &answers, self.today) {
            Ok(Outcome::Message(message)) => {
                self.show_menu(menu);
                if task.mutates() {
                    self.record_change(message);
                } else {
                    self.set_status(Tone::Success, message);
                }
            }
            Ok(Outcome::Report { title, body }) => {
                self.screen = Screen::Report(ReportView::new(title, &body, menu));
                self.set_status(
                    Tone::Info,
                    "Up/Down/PgUp/PgDn scroll, Enter or Esc returns, Q quits".to_string(),
                );
            }
            Err(err) => {
                warn!(task = %task.title(), %err, "Task failed");
                self.show_menu(menu);
                self.set_status(Tone::Error, err.to_string());
            }
        }
    }

    fn record_change(&mut self, message: String) {
        self.dirty = true;
        self.quit_armed = false;
        if !self.autosave {
            self.set_status(Tone::Success, format!("{message} (unsaved)"));
            return;
        }
        match self.persist() {
            Ok(()) => self.set_status(Tone::Success, message),
            Err(err) => self.set_status(Tone::Error, format!("{message}, but saving failed: {err}")),
        }
    }

    fn persist(&mut self) -> Result<()> {
        if let Err(err) = self.saves.save(&self.db) {
            error!("Failed to save {}: {err:#}", self.saves.path().display());
            return Err(err);
        }
        self.dirty = false;
        Ok(())
    }

    fn show_menu(&mut self, menu: Menu) {
        self.input.take();
        self.screen = Screen::Menu(menu);
    }

    fn leave_menu(&mut self, menu: Menu) {
        self.show_menu(menu.parent().unwrap_or(Menu::Main));
        if self.autosave || !menu.edits() || !self.dirty {
            return;
        }
        match self.persist() {
            Ok(()) => self.set_status(
                Tone::Success,
                format!("Saved changes to {}", self.saves.path().display()),
            ),
            Err(err) => self.set_status(Tone::Error, format!("Saving failed: {err}")),
        }
    }

    fn quit(&mut self) {
        if self.dirty && !self.quit_armed {
            if let Err(err) = self.persist() {
                self.quit_armed = true;
                self.set_status(
                    Tone::Error,
                    format!("Saving failed: {err}. Quit again to discard changes."),
                );
                return;
            }
        }
        self.should_quit = true;
    }

    fn set_status(&mut self, tone: Tone, message: String) {
        self.status = message;
        self.tone = tone;
    }

    fn draw(&mut self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(4),
            ])
            .split(frame.size());

        self.render_header(frame, layout[0]);
        match &self.screen {
            Screen::Menu(menu) => self.render_menu(frame, layout[1], *menu),
            Screen::Form(form) => self.render_form(frame, layout[1], form),
            Screen::Report(view) => self.render_report(frame, layout[1], view),
        }
        self.render_input(frame, layout[2]);
        self.render_status(frame, layout[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "NHL Stats Keeper",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   {} teams, {} players",
                    self.db.league().len(),
                    self.db.roster().len()
                ),
                Style::default().fg(self.theme.muted),
            ),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect, menu: Menu) {
        let lines: Vec<Line> = menu
            .lines()
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.primary_fg))))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(menu.title()));
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &FormState) {
        let mut lines: Vec<Line> = form
            .fields
            .iter()
            .zip(form.answers.iter())
            .map(|(field, (_, answer))| {
                Line::from(Span::styled(
                    format!("{}: {}", field.label, answer.display()),
                    Style::default().fg(self.theme.muted),
                ))
            })
            .collect();
        if let Some(field) = form.current() {
            lines.push(Line::from(Span::styled(
                format!("{}:", field.label),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(form.task.title()))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_report(&self, frame: &mut Frame, area: Rect, view: &ReportView) {
        let lines: Vec<Line> = view
            .lines
            .iter()
            .map(|line| {
                let style = if line.starts_with("****") || line.starts_with("====") {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else if line.starts_with("- -") {
                    Style::default().fg(self.theme.warning)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Line::from(Span::styled(line.clone(), style))
            })
            .collect();
        let title = format!(
            "{} ({}/{})",
            view.title,
            usize::from(view.scroll) + 1,
            view.lines.len().max(1)
        );
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((view.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.screen {
            Screen::Menu(_) => "Choice",
            Screen::Form(_) => "Answer",
            Screen::Report(_) => "Viewing report",
        };
        let line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(self.input.buffer.clone()),
        ]);
        let paragraph =
            Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if !matches!(self.screen, Screen::Report(_)) {
            let cursor_x = (area.x + 3 + self.input.cursor as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let color = match self.tone {
            Tone::Info => self.theme.primary_fg,
            Tone::Success => self.theme.success,
            Tone::Warning => self.theme.warning,
            Tone::Error => self.theme.danger,
        };
        let primary = Line::from(Span::styled(self.status.clone(), Style::default().fg(color)));
        let mut secondary = format!(
            "Data: {}  (auto-save {})",
            self.saves.path().display(),
            if self.autosave { "on" } else { "off" }
        );
        if self.dirty {
            secondary.push_str("  unsaved changes");
        }
        let paragraph = Paragraph::new(vec![
            primary,
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Replace tabs with spaces up to the next tab stop; the terminal buffer does not expand them.
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
