//! # Error Types
//!
//! Structured error types for stair_core. The dimensioning engine and the
//! norm checker never fail; these errors belong to the layers around them
//! (design files, locks, PDF export, parsing of user-supplied strings).
//!
//! ## Example
//!
//! ```rust
//! use stair_core::errors::{CalcError, CalcResult};
//!
//! fn parse_rise(raw: &str) -> CalcResult<f64> {
//!     raw.trim().parse().map_err(|_| CalcError::InvalidInput {
//!         field: "total_rise_mm".to_string(),
//!         value: raw.to_string(),
//!         reason: "Total rise must be a number".to_string(),
//!     })
//! }
//!
//! assert!(parse_rise("2700").is_ok());
//! assert!(parse_rise("tall").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for stair_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for everything outside the pure calculation core.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value could not be interpreted
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Export requested without any computed stair to export
    #[error("Nothing to export: {reason}")]
    NothingToExport { reason: String },

    /// Generic internal error (Typst compilation, PDF rendering)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a NothingToExport error
    pub fn nothing_to_export(reason: impl Into<String>) -> Self {
        CalcError::NothingToExport {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::NothingToExport { .. } => "NOTHING_TO_EXPORT",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("stair_type", "ramp", "Unknown stair type");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::nothing_to_export("empty").error_code(), "NOTHING_TO_EXPORT");
        assert_eq!(CalcError::file_error("open", "a.stw", "missing").error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_only_locks_are_recoverable() {
        assert!(CalcError::file_locked("a.stw", "someone", "now").is_recoverable());
        assert!(!CalcError::invalid_input("x", "1", "bad").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::nothing_to_export("project has no stairs");
        assert_eq!(error.to_string(), "Nothing to export: project has no stairs");
    }
}
