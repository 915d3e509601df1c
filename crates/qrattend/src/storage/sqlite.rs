//! `SQLite`-backed attendance store.
//!
//! Records are written to a database file so they survive process restarts.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{AttendanceRecord, AttendanceStatus};

use super::migrations;
use super::{AttendanceStore, ConnectionState};

const IN_MEMORY_PATH: &str = ":memory:";

/// Persistent attendance store.
///
/// The database is opened by [`AttendanceStore::connect`] and released by
/// [`AttendanceStore::close`]. While closed, reads go through a transient
/// read-only connection that never creates the file or writes to it. A file
/// without the attendance table reads as empty.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Open connection, present only while connected.
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Create a disconnected store for the database at `path`.
    ///
    /// Nothing is touched on disk until [`AttendanceStore::connect`].
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: None,
        }
    }

    /// Create a disconnected store backed by an in-memory database.
    ///
    /// The data lives only as long as the connection, so closing the store
    /// discards it.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }

    fn open_connection(&self) -> Result<Connection> {
        if self.is_in_memory() {
            let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
                path: self.path.clone(),
                source,
            })?;
            migrations::initialize_schema(&conn)?;
            return Ok(conn);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", self.path.display());
        let conn = Connection::open(&self.path).map_err(|source| Error::DatabaseOpen {
            path: self.path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;
        Ok(conn)
    }

    fn has_attendance_table(conn: &Connection) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'attendance'",
                [],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn query_all(conn: &Connection) -> Result<Vec<AttendanceRecord>> {
        let mut stmt = conn.prepare(
            r"
            SELECT id, student_id, status, timestamp
            FROM attendance ORDER BY id ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Convert a database row to an `AttendanceRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AttendanceRecord> {
        let id: i64 = row.get(0)?;
        let student_id: String = row.get(1)?;
        let status_str: String = row.get(2)?;
        let timestamp_str: String = row.get(3)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        let status = status_str.parse().unwrap_or_else(|_| {
            warn!("Unknown attendance status: {}, defaulting to PRESENT", status_str);
            AttendanceStatus::Present
        });

        Ok(AttendanceRecord {
            id: Some(id),
            student_id,
            status,
            timestamp,
        })
    }
}

impl AttendanceStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn state(&self) -> ConnectionState {
        if self.conn.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    fn connect(&mut self) -> Result<String> {
        if self.conn.is_none() {
            self.conn = Some(self.open_connection()?);
            info!("Database opened successfully at {}", self.path.display());
        }
        Ok(format!("Connected to {}", self.path.display()))
    }

    fn insert(&mut self, record: &AttendanceRecord) -> Result<i64> {
        let Some(conn) = &self.conn else {
            warn!(student_id = %record.student_id, "Rejected insert: database not connected");
            return Err(Error::StorageDisconnected);
        };

        conn.execute(
            r"
            INSERT INTO attendance (student_id, status, timestamp)
            VALUES (?1, ?2, ?3)
            ",
            params![
                record.student_id,
                record.status.as_str(),
                record.timestamp.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted record with id {}", id);
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<AttendanceRecord>> {
        if let Some(conn) = &self.conn {
            return Self::query_all(conn);
        }

        if self.is_in_memory() || !self.path.exists() {
            return Ok(Vec::new());
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|source| Error::DatabaseOpen {
                path: self.path.clone(),
                source,
            })?;
        if !Self::has_attendance_table(&conn)? {
            debug!("No attendance table in {}, nothing to read", self.path.display());
            return Ok(Vec::new());
        }
        Self::query_all(&conn)
    }

    fn close(&mut self) -> Result<String> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, source)| Error::DatabaseQuery(source))?;
            debug!("Closed database at {}", self.path.display());
        }
        Ok("Connection closed".to_string())
    }
}
