//! In-memory attendance store.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::AttendanceRecord;

use super::{AttendanceStore, ConnectionState};

/// Append-only, unindexed list of records held for the lifetime of the
/// process.
///
/// Records survive `close`/`connect` cycles; they are lost when the store
/// is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: ConnectionState,
    records: Vec<AttendanceRecord>,
}

impl MemoryStore {
    /// Create an empty, disconnected store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttendanceStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn connect(&mut self) -> Result<String> {
        self.state = ConnectionState::Connected;
        info!("Connected to in-memory attendance store");
        Ok("Connected to in-memory attendance store".to_string())
    }

    fn insert(&mut self, record: &AttendanceRecord) -> Result<i64> {
        if self.state != ConnectionState::Connected {
            warn!(student_id = %record.student_id, "Rejected insert: store not connected");
            return Err(Error::StorageDisconnected);
        }

        let id = i64::try_from(self.records.len() + 1)
            .map_err(|_| Error::internal("record count overflow"))?;
        self.records.push(record.clone().with_id(id));
        debug!("Inserted record with id {}", id);
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<AttendanceRecord>> {
        Ok(self.records.clone())
    }

    fn close(&mut self) -> Result<String> {
        self.state = ConnectionState::Disconnected;
        debug!("Closed in-memory attendance store");
        Ok("Connection closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.connect().unwrap();
        store
    }

    #[test]
    fn test_new_store_is_disconnected_and_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.state(), ConnectionState::Disconnected);
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_connect_message() {
        let mut store = MemoryStore::new();
        let msg = store.connect().unwrap();
        assert!(msg.contains("Connected"));
        assert!(store.is_connected());
    }

    #[test]
    fn test_connect_twice_is_noop() {
        let mut store = connected_store();
        store.insert(&AttendanceRecord::present("S1")).unwrap();
        store.connect().unwrap();
        assert!(store.is_connected());
        assert_eq!(store.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = connected_store();
        let id1 = store.insert(&AttendanceRecord::present("A")).unwrap();
        let id2 = store.insert(&AttendanceRecord::present("B")).unwrap();
        assert_eq!((id1, id2), (1, 2));
    }

    #[test]
    fn test_fetch_all_preserves_insertion_order() {
        let mut store = connected_store();
        for id in ["C", "A", "B"] {
            store.insert(&AttendanceRecord::present(id)).unwrap();
        }

        let ids: Vec<String> = store
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|r| r.student_id)
            .collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_insert_while_disconnected_does_not_mutate() {
        let mut store = MemoryStore::new();
        let before = store.fetch_all().unwrap();

        let result = store.insert(&AttendanceRecord::present("S1"));
        assert!(matches!(result, Err(Error::StorageDisconnected)));
        assert_eq!(store.fetch_all().unwrap(), before);
    }

    #[test]
    fn test_insert_after_close_is_rejected() {
        let mut store = connected_store();
        store.insert(&AttendanceRecord::present("S1")).unwrap();
        assert_eq!(store.close().unwrap(), "Connection closed");

        assert!(store.insert(&AttendanceRecord::present("S2")).is_err());
        // Records survive the close.
        assert_eq!(store.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut store = connected_store();
        store.insert(&AttendanceRecord::present("A")).unwrap();
        store.insert(&AttendanceRecord::present("A")).unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].same_entry(&records[1]));
    }
}
