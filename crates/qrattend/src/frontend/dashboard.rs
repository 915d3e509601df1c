//! Full-screen terminal dashboard.
//!
//! Three actions (Connect DB, Scan QR, Refresh) above a two-column record
//! table, with a status line in place of pop-up messages.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{event, execute};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::AttendanceRecord;
use crate::storage::AttendanceStore;

use super::{Action, Controller, Outcome};

/// A clickable control on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Connect,
    Scan,
    Refresh,
}

const BUTTONS: [Button; 3] = [Button::Connect, Button::Scan, Button::Refresh];

impl Button {
    fn label(self) -> &'static str {
        match self {
            Self::Connect => "Connect DB",
            Self::Scan => "Scan QR",
            Self::Refresh => "Refresh",
        }
    }

    fn hotkey(self) -> char {
        match self {
            Self::Connect => 'c',
            Self::Scan => 's',
            Self::Refresh => 'r',
        }
    }

    fn action(self) -> Action {
        match self {
            Self::Connect => Action::Connect,
            Self::Scan => Action::Scan,
            Self::Refresh => Action::View,
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Connect => Color::Blue,
            Self::Scan => Color::Green,
            Self::Refresh => Color::Yellow,
        }
    }
}

/// Message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

/// Dashboard state driven by key events.
#[derive(Debug)]
pub struct Dashboard<'a, S> {
    controller: &'a mut Controller<S>,
    records: Vec<AttendanceRecord>,
    status: Status,
    focus: usize,
    table_state: TableState,
    exit_error: Option<Error>,
}

impl<'a, S: AttendanceStore> Dashboard<'a, S> {
    /// Create a dashboard over `controller` with an empty table.
    pub fn new(controller: &'a mut Controller<S>) -> Self {
        Self {
            controller,
            records: Vec::new(),
            status: Status::Info("Press c to connect the database".to_string()),
            focus: 0,
            table_state: TableState::default(),
            exit_error: None,
        }
    }

    /// Records currently shown in the table.
    #[must_use]
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Text of the status line.
    #[must_use]
    pub fn status_text(&self) -> &str {
        match &self.status {
            Status::Info(text) | Status::Error(text) => text,
        }
    }

    /// Whether the status line reports a failure.
    #[must_use]
    pub fn status_is_error(&self) -> bool {
        matches!(self.status, Status::Error(_))
    }

    /// Handle a key press. Returns `true` when the dashboard should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit();
                return true;
            }
            KeyCode::Tab | KeyCode::Right => self.focus = (self.focus + 1) % BUTTONS.len(),
            KeyCode::BackTab | KeyCode::Left => {
                self.focus = (self.focus + BUTTONS.len() - 1) % BUTTONS.len();
            }
            KeyCode::Enter => self.press(BUTTONS[self.focus]),
            KeyCode::Down => self.table_state.select_next(),
            KeyCode::Up => self.table_state.select_previous(),
            KeyCode::Char(c) => {
                if let Some(button) = BUTTONS.iter().copied().find(|b| b.hotkey() == c) {
                    self.press(button);
                }
            }
            _ => {}
        }
        false
    }

    fn press(&mut self, button: Button) {
        if let Some(index) = BUTTONS.iter().position(|b| *b == button) {
            self.focus = index;
        }
        debug!(button = button.label(), "Button pressed");

        match self.controller.dispatch(button.action()) {
            Ok(Outcome::Connected(message)) => self.status = Status::Info(message),
            Ok(Outcome::Logged(record)) => {
                self.status = Status::Info(format!("Logged: {}", record.student_id));
                self.refresh();
            }
            Ok(Outcome::Records(records)) => self.show(records),
            Ok(Outcome::Exited(_) | Outcome::Ignored) => {}
            Err(err) => self.status = Status::Error(err.to_string()),
        }
    }

    fn refresh(&mut self) {
        match self.controller.dispatch(Action::View) {
            Ok(Outcome::Records(records)) => self.records = records,
            Ok(_) => {}
            Err(err) => self.status = Status::Error(err.to_string()),
        }
    }

    fn show(&mut self, records: Vec<AttendanceRecord>) {
        self.status = Status::Info(format!("{} record(s)", records.len()));
        self.records = records;
    }

    /// Take the error raised while closing the store on quit, if any.
    pub fn take_exit_error(&mut self) -> Option<Error> {
        self.exit_error.take()
    }

    fn quit(&mut self) {
        if let Err(err) = self.controller.dispatch(Action::Exit) {
            warn!(error = %err, "Failed to close attendance store");
            self.exit_error = Some(err);
        }
    }
}

/// Run the dashboard on the terminal until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to, or if the
/// store fails to close when the user quits.
pub fn run_dashboard<S: AttendanceStore>(controller: &mut Controller<S>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(err.into());
    }

    let outcome = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(mut terminal) => {
            let mut dashboard = Dashboard::new(controller);
            run_loop(&mut terminal, &mut dashboard)
        }
        Err(err) => Err(err.into()),
    };

    // Restore terminal.
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();

    outcome
}

fn run_loop<S: AttendanceStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dashboard: &mut Dashboard<'_, S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, dashboard))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if dashboard.handle_key(key) {
            return dashboard.take_exit_error().map_or(Ok(()), Err);
        }
    }
}

fn ui<S: AttendanceStore>(f: &mut Frame, dashboard: &mut Dashboard<'_, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new("QR Attendance System")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let button_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Min(0),
        ])
        .split(chunks[1]);
    for (index, button) in BUTTONS.iter().enumerate() {
        let style = if index == dashboard.focus {
            Style::default().fg(Color::Black).bg(button.color())
        } else {
            Style::default().fg(button.color())
        };
        let widget = Paragraph::new(format!("[{}] {}", button.hotkey(), button.label()))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, button_areas[index]);
    }

    let rows = dashboard.records.iter().map(|record| {
        Row::new(vec![record.student_id.clone(), record.status.to_string()])
    });
    let table = Table::new(rows, [Constraint::Length(28), Constraint::Length(12)])
        .header(
            Row::new(vec!["Student ID", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Attendance Records"),
        )
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol(">");
    f.render_stateful_widget(table, chunks[2], &mut dashboard.table_state);

    let status_style = if dashboard.status_is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let status = Paragraph::new(dashboard.status_text().to_string())
        .style(status_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status · Tab/Enter: select · c/s/r: actions · q/Esc: quit"),
        );
    f.render_widget(status, chunks[3]);
}
