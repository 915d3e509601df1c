//! Attendance service.
//!
//! Turns scanned student identifiers into PRESENT records and forwards them
//! to the store. Front-ends talk to the store only through this type.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::record::AttendanceRecord;
use crate::scanner::Scanner;
use crate::storage::{open_store, AttendanceStore};

/// Maps scans to attendance records.
#[derive(Debug)]
pub struct AttendanceService<S> {
    store: S,
}

impl AttendanceService<Box<dyn AttendanceStore>> {
    /// Create a service over the store selected by `config`.
    ///
    /// The store is left disconnected, so reading through [`Self::list`]
    /// never creates a database.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(open_store(config))
    }
}

impl<S: AttendanceStore> AttendanceService<S> {
    /// Create a service writing to `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Connect the underlying store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn connect(&mut self) -> Result<String> {
        self.store.connect()
    }

    /// Disconnect the underlying store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to close cleanly.
    pub fn close(&mut self) -> Result<String> {
        self.store.close()
    }

    /// Record `student_id` as PRESENT.
    ///
    /// The identifier is not validated: empty strings and repeats are logged
    /// as distinct entries. On success the returned record carries the id
    /// assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageDisconnected`] if the store is not
    /// connected, in which case nothing was stored.
    pub fn log(&mut self, student_id: &str) -> Result<AttendanceRecord> {
        let record = AttendanceRecord::present(student_id);
        let id = self.store.insert(&record)?;
        info!(student_id, id, "Logged attendance");
        Ok(record.with_id(id))
    }

    /// Read a student identifier from `source` with `scanner`, then log it.
    ///
    /// # Errors
    ///
    /// Returns a scan error if decoding fails, or any error from [`Self::log`].
    pub fn scan_and_log<T: Scanner + ?Sized>(
        &mut self,
        scanner: &T,
        source: &str,
    ) -> Result<AttendanceRecord> {
        let student_id = scanner.read(source)?;
        debug!(scanner = scanner.name(), student_id = %student_id, "Scan decoded");
        self.log(&student_id)
    }

    /// All records, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self) -> Result<Vec<AttendanceRecord>> {
        self.store.fetch_all()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::AttendanceStatus;
    use crate::scanner::{PayloadFileScanner, PlaceholderScanner, PLACEHOLDER_STUDENT_ID};
    use crate::storage::{MemoryStore, SqliteStore};

    fn service() -> AttendanceService<MemoryStore> {
        AttendanceService::new(MemoryStore::new())
    }

    #[test]
    fn test_list_empty_before_any_log() {
        let service = service();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_log_returns_present_record() {
        let mut service = service();
        service.connect().unwrap();

        let record = service.log("2025001234").unwrap();
        assert_eq!(record.student_id, "2025001234");
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.id, Some(1));
    }

    // Logging against a disconnected store is reported as an error instead
    // of handing back a record that was never stored.
    #[test]
    fn test_log_while_disconnected_reports_failure() {
        let mut service = service();

        let err = service.log("S1").unwrap_err();
        assert!(matches!(err, Error::StorageDisconnected));
    }

    #[test]
    fn test_log_accepts_unvalidated_ids() {
        let mut service = service();
        service.connect().unwrap();

        assert_eq!(service.log("").unwrap().student_id, "");
        assert_eq!(service.log("not an id!").unwrap().student_id, "not an id!");
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_scenario_connect_log_list() {
        let mut service = service();
        service.connect().unwrap();
        service.log("S1").unwrap();

        let records = service.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_id, "S1");
        assert_eq!(records[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn test_scenario_log_without_connect() {
        let mut service = service();

        assert!(service.log("S1").is_err());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_scenario_duplicates_are_distinct_events() {
        let mut service = service();
        service.connect().unwrap();
        service.log("A").unwrap();
        service.log("A").unwrap();

        let records = service.list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].same_entry(&records[1]));
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn test_scan_and_log_with_placeholder() {
        let mut service = service();
        service.connect().unwrap();

        let record = service
            .scan_and_log(&PlaceholderScanner, "sample_qr.png")
            .unwrap();
        assert_eq!(record.student_id, PLACEHOLDER_STUDENT_ID);
    }

    #[test]
    fn test_scan_and_log_decode_failure_stores_nothing() {
        let mut service = service();
        service.connect().unwrap();

        let err = service
            .scan_and_log(&PayloadFileScanner, "/nonexistent/payload.txt")
            .unwrap_err();
        assert!(err.is_decode_error());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_close_then_log_fails() {
        let mut service = service();
        service.connect().unwrap();
        service.log("S1").unwrap();
        service.close().unwrap();

        assert!(service.log("S2").unwrap_err().is_disconnected());
        assert_eq!(service.list().unwrap().len(), 1);
        assert!(!service.store().is_connected());
    }

    #[test]
    fn test_list_from_config_does_not_create_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("attendance.db");
        let mut config = Config::default();
        config.storage.backend = crate::storage::StorageBackend::Sqlite;
        config.storage.database_path = Some(path.clone());

        let service = AttendanceService::from_config(&config);
        assert!(service.list().unwrap().is_empty());
        assert!(!path.exists());
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_service_over_sqlite() {
        let mut service = AttendanceService::new(SqliteStore::in_memory());
        service.connect().unwrap();
        service.log("S1").unwrap();
        service.log("S2").unwrap();

        let ids: Vec<String> = service
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.student_id)
            .collect();
        assert_eq!(ids, vec!["S1", "S2"]);
    }
}
