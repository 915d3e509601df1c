//! Storage layer for qrattend.
//!
//! Attendance records are kept by an [`AttendanceStore`]. Writes are gated
//! by a typed [`ConnectionState`]: a store accepts inserts only after
//! [`AttendanceStore::connect`], while reads are always available.
//!
//! Two backends are provided:
//! - [`MemoryStore`]: process-lifetime list, lost on exit
//! - [`SqliteStore`]: `SQLite` file that survives restarts

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::record::AttendanceRecord;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Connection state of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Inserts are rejected.
    #[default]
    Disconnected,
    /// Inserts are accepted.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// In-process list; records vanish when the process exits.
    #[default]
    Memory,
    /// `SQLite` database file.
    Sqlite,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Capability shared by every attendance storage backend.
pub trait AttendanceStore: fmt::Debug {
    /// The name of this backend (for logging/status output).
    fn name(&self) -> &'static str;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Connect the store so it accepts inserts.
    ///
    /// Returns a human-readable status message. Connecting an already
    /// connected store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be opened.
    fn connect(&mut self) -> Result<String>;

    /// Append a record, returning the id assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageDisconnected`] if the store is not
    /// connected (nothing is written), or a storage error.
    fn insert(&mut self, record: &AttendanceRecord) -> Result<i64>;

    /// All records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn fetch_all(&self) -> Result<Vec<AttendanceRecord>>;

    /// Disconnect the store. Returns a human-readable status message.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails to close cleanly.
    fn close(&mut self) -> Result<String>;

    /// Whether the store currently accepts inserts.
    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

impl<T: AttendanceStore + ?Sized> AttendanceStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn state(&self) -> ConnectionState {
        (**self).state()
    }

    fn connect(&mut self) -> Result<String> {
        (**self).connect()
    }

    fn insert(&mut self, record: &AttendanceRecord) -> Result<i64> {
        (**self).insert(record)
    }

    fn fetch_all(&self) -> Result<Vec<AttendanceRecord>> {
        (**self).fetch_all()
    }

    fn close(&mut self) -> Result<String> {
        (**self).close()
    }
}

/// Build the store selected by the configuration.
///
/// The store starts out disconnected.
#[must_use]
pub fn open_store(config: &Config) -> Box<dyn AttendanceStore> {
    match config.storage.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Sqlite => Box::new(SqliteStore::new(config.database_path())),
    }
}
