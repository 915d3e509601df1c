//! Front-ends for qrattend.
//!
//! Both the console menu and the terminal dashboard are thin dispatchers:
//! each user action maps to one [`Controller::dispatch`] call, and the
//! returned [`Outcome`] is rendered. The controller is the single place
//! where actions reach the attendance service.

pub mod console;
pub mod dashboard;

use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::record::AttendanceRecord;
use crate::scanner::{build_scanner, Scanner};
use crate::service::AttendanceService;
use crate::storage::AttendanceStore;

pub use console::ConsoleMenu;
pub use dashboard::run_dashboard;

/// A discrete user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Connect the store.
    Connect,
    /// Scan the sample source and log the result.
    Scan,
    /// Show all records.
    View,
    /// Leave the front-end.
    Exit,
}

impl Action {
    /// Map a console menu choice (`"1"` to `"4"`) to an action.
    ///
    /// Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Connect),
            "2" => Some(Self::Scan),
            "3" => Some(Self::View),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Front-end state.
///
/// `Idle` is both the initial state and the state every action returns to;
/// `Exit` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UiState {
    /// Waiting for an action.
    #[default]
    Idle,
    /// Connecting the store.
    Connecting,
    /// Scanning and logging.
    Scanning,
    /// Reading records back.
    Viewing,
    /// Done; no further actions are handled.
    Exit,
}

impl UiState {
    /// The state entered when `action` is taken in this state.
    #[must_use]
    pub fn enter(self, action: Action) -> Self {
        if self.is_terminal() {
            return self;
        }
        match action {
            Action::Connect => Self::Connecting,
            Action::Scan => Self::Scanning,
            Action::View => Self::Viewing,
            Action::Exit => Self::Exit,
        }
    }

    /// Whether this state ends the front-end.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Exit
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Scanning => "scanning",
            Self::Viewing => "viewing",
            Self::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// Result of a successfully dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The store is connected; carries its status message.
    Connected(String),
    /// A scan was logged.
    Logged(AttendanceRecord),
    /// All records, in insertion order.
    Records(Vec<AttendanceRecord>),
    /// The store was closed and the front-end should stop.
    Exited(String),
    /// The action arrived after exit and was not handled.
    Ignored,
}

/// Routes front-end actions to the attendance service.
#[derive(Debug)]
pub struct Controller<S> {
    service: AttendanceService<S>,
    scanner: Box<dyn Scanner>,
    sample_source: String,
    state: UiState,
}

impl Controller<Box<dyn AttendanceStore>> {
    /// Build a controller with the store and scanner selected by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AttendanceService::from_config(config),
            build_scanner(config.scanner.backend),
            config.scanner.sample_source.clone(),
        )
    }
}

impl<S: AttendanceStore> Controller<S> {
    /// Create a controller scanning `sample_source` with `scanner`.
    #[must_use]
    pub fn new(
        service: AttendanceService<S>,
        scanner: Box<dyn Scanner>,
        sample_source: impl Into<String>,
    ) -> Self {
        Self {
            service,
            scanner,
            sample_source: sample_source.into(),
            state: UiState::Idle,
        }
    }

    /// Current front-end state.
    #[must_use]
    pub fn state(&self) -> UiState {
        self.state
    }

    /// The attendance service behind this controller.
    #[must_use]
    pub fn service(&self) -> &AttendanceService<S> {
        &self.service
    }

    /// Handle one action.
    ///
    /// The state moves to the action's state for the duration of the call
    /// and settles back to `Idle` afterwards, unless the action was `Exit`.
    ///
    /// # Errors
    ///
    /// Returns the service, store or scanner error that stopped the action.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        if self.state.is_terminal() {
            debug!(?action, "Ignoring action after exit");
            return Ok(Outcome::Ignored);
        }

        self.state = self.state.enter(action);
        debug!(?action, state = %self.state, "Dispatching action");

        let result = match action {
            Action::Connect => self.service.connect().map(Outcome::Connected),
            Action::Scan => self
                .service
                .scan_and_log(&*self.scanner, &self.sample_source)
                .map(Outcome::Logged),
            Action::View => self.service.list().map(Outcome::Records),
            Action::Exit => self.service.close().map(Outcome::Exited),
        };

        if !self.state.is_terminal() {
            self.state = UiState::Idle;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AttendanceStatus;
    use crate::scanner::{PayloadFileScanner, PlaceholderScanner, PLACEHOLDER_STUDENT_ID};
    use crate::storage::MemoryStore;

    fn controller() -> Controller<MemoryStore> {
        Controller::new(
            AttendanceService::new(MemoryStore::new()),
            Box::new(PlaceholderScanner),
            "sample_qr.png",
        )
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(Action::from_menu_choice("1"), Some(Action::Connect));
        assert_eq!(Action::from_menu_choice("2\n"), Some(Action::Scan));
        assert_eq!(Action::from_menu_choice(" 3 "), Some(Action::View));
        assert_eq!(Action::from_menu_choice("4"), Some(Action::Exit));
        assert_eq!(Action::from_menu_choice("5"), None);
        assert_eq!(Action::from_menu_choice(""), None);
        assert_eq!(Action::from_menu_choice("exit"), None);
    }

    #[test]
    fn test_state_transitions_from_idle() {
        assert_eq!(UiState::Idle.enter(Action::Connect), UiState::Connecting);
        assert_eq!(UiState::Idle.enter(Action::Scan), UiState::Scanning);
        assert_eq!(UiState::Idle.enter(Action::View), UiState::Viewing);
        assert_eq!(UiState::Idle.enter(Action::Exit), UiState::Exit);
    }

    #[test]
    fn test_exit_is_terminal() {
        for action in [Action::Connect, Action::Scan, Action::View, Action::Exit] {
            assert_eq!(UiState::Exit.enter(action), UiState::Exit);
        }
        assert!(UiState::Exit.is_terminal());
        assert!(!UiState::Idle.is_terminal());
    }

    #[test]
    fn test_ui_state_display() {
        assert_eq!(UiState::Scanning.to_string(), "scanning");
    }

    #[test]
    fn test_dispatch_returns_to_idle() {
        let mut controller = controller();
        assert_eq!(controller.state(), UiState::Idle);

        for action in [Action::Connect, Action::Scan, Action::View] {
            controller.dispatch(action).unwrap();
            assert_eq!(controller.state(), UiState::Idle);
        }
    }

    #[test]
    fn test_dispatch_returns_to_idle_after_failure() {
        let mut controller = controller();
        assert!(controller.dispatch(Action::Scan).is_err());
        assert_eq!(controller.state(), UiState::Idle);
    }

    #[test]
    fn test_connect_scan_view() {
        let mut controller = controller();

        assert!(matches!(
            controller.dispatch(Action::Connect).unwrap(),
            Outcome::Connected(_)
        ));

        let Outcome::Logged(record) = controller.dispatch(Action::Scan).unwrap() else {
            panic!("expected a logged record");
        };
        assert_eq!(record.student_id, PLACEHOLDER_STUDENT_ID);
        assert_eq!(record.status, AttendanceStatus::Present);

        let Outcome::Records(records) = controller.dispatch(Action::View).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 1);
        assert!(records[0].same_entry(&record));
    }

    #[test]
    fn test_scan_without_connect_is_error() {
        let mut controller = controller();
        let err = controller.dispatch(Action::Scan).unwrap_err();
        assert!(err.is_disconnected());
        assert_eq!(
            controller.dispatch(Action::View).unwrap(),
            Outcome::Records(Vec::new())
        );
    }

    #[test]
    fn test_scan_decode_error_surfaces() {
        let mut controller = Controller::new(
            AttendanceService::new(MemoryStore::new()),
            Box::new(PayloadFileScanner),
            "/nonexistent/payload.txt",
        );
        controller.dispatch(Action::Connect).unwrap();
        assert!(controller.dispatch(Action::Scan).unwrap_err().is_decode_error());
    }

    #[test]
    fn test_exit_closes_store_and_ignores_later_actions() {
        let mut controller = controller();
        controller.dispatch(Action::Connect).unwrap();

        let outcome = controller.dispatch(Action::Exit).unwrap();
        assert_eq!(outcome, Outcome::Exited("Connection closed".to_string()));
        assert_eq!(controller.state(), UiState::Exit);
        assert!(!controller.service().store().is_connected());

        assert_eq!(controller.dispatch(Action::Connect).unwrap(), Outcome::Ignored);
        assert_eq!(controller.state(), UiState::Exit);
    }

    #[test]
    fn test_view_before_connect_on_empty_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance.db");
        std::fs::File::create(&path).unwrap();

        let mut config = Config::default();
        config.storage.backend = crate::storage::StorageBackend::Sqlite;
        config.storage.database_path = Some(path);

        let mut controller = Controller::from_config(&config);
        assert_eq!(
            controller.dispatch(Action::View).unwrap(),
            Outcome::Records(Vec::new())
        );
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let controller = Controller::from_config(&Config::default());
        assert_eq!(controller.service().store().name(), "memory");
        assert_eq!(controller.state(), UiState::Idle);
    }
}
