//! `SQLite` schema definitions for qrattend.

/// SQL statement to create the attendance table.
///
/// Rows are read back ordered by `id`, which follows insertion order.
pub const CREATE_ATTENDANCE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL,
    status TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ATTENDANCE_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_attendance_table_columns() {
        assert!(CREATE_ATTENDANCE_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_ATTENDANCE_TABLE.contains("student_id TEXT NOT NULL"));
        assert!(CREATE_ATTENDANCE_TABLE.contains("status TEXT NOT NULL"));
        assert!(CREATE_ATTENDANCE_TABLE.contains("timestamp TEXT NOT NULL"));
    }

    #[test]
    fn test_student_id_is_not_unique() {
        assert!(!CREATE_ATTENDANCE_TABLE.contains("UNIQUE"));
    }
}
