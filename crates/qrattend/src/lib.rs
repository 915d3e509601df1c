//! `qrattend` - QR-code attendance logging
//!
//! This library provides the core functionality for turning scanned student
//! identifiers into timestamped PRESENT records, storing them, and listing
//! them back through a console menu, a terminal dashboard or the CLI.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod record;
pub mod scanner;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use frontend::{Action, Controller, Outcome, UiState};
pub use logging::init_logging;
pub use record::{AttendanceRecord, AttendanceStatus};
pub use scanner::{DecodeError, Scanner, ScannerBackend};
pub use service::AttendanceService;
pub use storage::{AttendanceStore, ConnectionState, MemoryStore, SqliteStore, StorageBackend};
