//! QR scanner abstraction.
//!
//! A scanner turns an input reference (an image path, a payload file, ...)
//! into a student identifier. The attendance pipeline only sees the
//! [`Scanner`] trait, so a real image-decoding backend can replace the
//! placeholder without touching the service layer.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Identifier returned by the placeholder scanner for every input.
pub const PLACEHOLDER_STUDENT_ID: &str = "TEMP-STUDENT-ID-123";

/// Errors that can occur while decoding a scan.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The scan source could not be read.
    #[error("cannot read scan source {path}: {source}")]
    Unreadable {
        /// Path of the scan source.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The decoded payload was empty.
    #[error("empty QR payload")]
    EmptyPayload,

    /// The decoded payload is not a usable identifier.
    #[error("invalid QR payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected.
        reason: String,
    },
}

/// Which scanner implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScannerBackend {
    /// Always returns [`PLACEHOLDER_STUDENT_ID`].
    #[default]
    Placeholder,
    /// Reads an already-decoded payload from a text file.
    PayloadFile,
}

impl fmt::Display for ScannerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "placeholder"),
            Self::PayloadFile => write!(f, "payload-file"),
        }
    }
}

/// Trait for QR scanner backends.
pub trait Scanner: fmt::Debug {
    /// The name of this scanner (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Decode the given source into a student identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the source cannot be decoded.
    fn read(&self, source: &str) -> Result<String, DecodeError>;
}

impl<T: Scanner + ?Sized> Scanner for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&self, source: &str) -> Result<String, DecodeError> {
        (**self).read(source)
    }
}

/// Build the scanner selected by `backend`.
#[must_use]
pub fn build_scanner(backend: ScannerBackend) -> Box<dyn Scanner> {
    match backend {
        ScannerBackend::Placeholder => Box::new(PlaceholderScanner),
        ScannerBackend::PayloadFile => Box::new(PayloadFileScanner),
    }
}

/// Stand-in for QR image decoding.
///
/// Ignores its input and always yields [`PLACEHOLDER_STUDENT_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderScanner;

impl Scanner for PlaceholderScanner {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn read(&self, source: &str) -> Result<String, DecodeError> {
        debug!(source, "Attempting to read QR");
        Ok(PLACEHOLDER_STUDENT_ID.to_string())
    }
}

/// Reads the decoded text of a QR code from a file.
///
/// The trimmed file content is the student identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadFileScanner;

impl PayloadFileScanner {
    /// Turn raw payload text into an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error for empty payloads or payloads with control characters.
    pub fn decode_payload(raw: &str) -> Result<String, DecodeError> {
        let payload = raw.trim();
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }
        if payload.chars().any(char::is_control) {
            return Err(DecodeError::InvalidPayload {
                reason: "payload contains control characters".to_string(),
            });
        }
        Ok(payload.to_string())
    }
}

impl Scanner for PayloadFileScanner {
    fn name(&self) -> &'static str {
        "payload-file"
    }

    fn read(&self, source: &str) -> Result<String, DecodeError> {
        let path = Path::new(source);
        let raw = std::fs::read_to_string(path).map_err(|source| DecodeError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let id = Self::decode_payload(&raw)?;
        trace!(path = %path.display(), id = %id, "Decoded payload");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_placeholder_returns_constant_for_any_input() {
        let scanner = PlaceholderScanner;
        for source in ["sample_qr.png", "", "   ", "/no/such/file", "ünïcødé", "2025001234"] {
            assert_eq!(scanner.read(source).unwrap(), PLACEHOLDER_STUDENT_ID);
        }
    }

    #[test]
    fn test_scanner_names() {
        assert_eq!(PlaceholderScanner.name(), "placeholder");
        assert_eq!(PayloadFileScanner.name(), "payload-file");
    }

    #[test]
    fn test_build_scanner() {
        assert_eq!(build_scanner(ScannerBackend::Placeholder).name(), "placeholder");
        assert_eq!(build_scanner(ScannerBackend::PayloadFile).name(), "payload-file");
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(ScannerBackend::Placeholder.to_string(), "placeholder");
        assert_eq!(ScannerBackend::PayloadFile.to_string(), "payload-file");
    }

    #[test]
    fn test_decode_payload_trims() {
        assert_eq!(
            PayloadFileScanner::decode_payload("  STU1-QRCODE\n").unwrap(),
            "STU1-QRCODE"
        );
    }

    #[test]
    fn test_decode_payload_empty() {
        assert!(matches!(
            PayloadFileScanner::decode_payload(" \n\t"),
            Err(DecodeError::EmptyPayload)
        ));
    }

    #[test]
    fn test_decode_payload_control_characters() {
        let err = PayloadFileScanner::decode_payload("STU\u{7}1").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { .. }));
        assert!(err.to_string().contains("control characters"));
    }

    #[test]
    fn test_payload_file_scanner_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2025001234").unwrap();

        let id = PayloadFileScanner
            .read(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(id, "2025001234");
    }

    #[test]
    fn test_payload_file_scanner_missing_file() {
        let err = PayloadFileScanner.read("/nonexistent/qr.txt").unwrap_err();
        assert!(matches!(err, DecodeError::Unreadable { .. }));
        assert!(err.to_string().contains("/nonexistent/qr.txt"));
    }

    #[test]
    fn test_boxed_scanner_delegates() {
        let scanner: Box<dyn Scanner> = Box::new(PlaceholderScanner);
        assert_eq!(scanner.read("x").unwrap(), PLACEHOLDER_STUDENT_ID);
    }
}
