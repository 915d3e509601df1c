//! Attendance record types.
//!
//! A record is created by the attendance service for every scan and is then
//! held by the storage backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Attendance status of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// The student was scanned in.
    #[default]
    Present,
}

impl AttendanceStatus {
    /// The stored and displayed form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "PRESENT",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESENT" => Ok(Self::Present),
            other => Err(Error::internal(format!(
                "unknown attendance status: {other}"
            ))),
        }
    }
}

/// A single attendance entry.
///
/// No uniqueness is enforced: the same student may appear any number of
/// times, in the order the scans were logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Identifier assigned by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The scanned student identifier, unvalidated.
    pub student_id: String,

    /// Attendance status.
    pub status: AttendanceStatus,

    /// When the record was created.
    pub timestamp: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Create a PRESENT record for the given student, stamped with now.
    #[must_use]
    pub fn present(student_id: impl Into<String>) -> Self {
        Self {
            id: None,
            student_id: student_id.into(),
            status: AttendanceStatus::Present,
            timestamp: Utc::now(),
        }
    }

    /// Return this record with the storage-assigned id set.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Check whether two records describe the same attendance entry,
    /// ignoring storage id and timestamp.
    #[cfg(test)]
    pub(crate) fn same_entry(&self, other: &Self) -> bool {
        self.student_id == other.student_id && self.status == other.status
    }
}

impl fmt::Display for AttendanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.student_id,
            self.status,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
