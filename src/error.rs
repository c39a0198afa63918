//! Custom error types for envelope-rollover
//!
//! This module defines the error hierarchy for the rollover engine using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::models::PeriodId;

/// The main error type for rollover operations
#[derive(Error, Debug)]
pub enum RolloverError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for input records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The backing store could not complete a read or write
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// An archive record for this period already exists
    #[error("Archive record already exists for period {period_id}")]
    ArchiveConflict { period_id: PeriodId },

    /// The persisted marker is unreadable or ahead of the clock
    #[error("Invalid marker state: {0}")]
    InvalidMarkerState(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl RolloverError {
    /// Create a "not found" error for archive records
    pub fn archive_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Archive record",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a store failure the caller may retry
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<std::io::Error> for RolloverError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RolloverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for rollover operations
pub type RolloverResult<T> = Result<T, RolloverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RolloverError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_archive_conflict_display() {
        let err = RolloverError::ArchiveConflict {
            period_id: PeriodId::new(2024, 5),
        };
        assert_eq!(
            err.to_string(),
            "Archive record already exists for period 2024-05"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = RolloverError::archive_not_found("2024-05");
        assert_eq!(err.to_string(), "Archive record not found: 2024-05");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RolloverError = io_err.into();
        assert!(matches!(err, RolloverError::Io(_)));
    }
}
