//! Error types for Orbital Core

use crate::types::BookId;
use thiserror::Error;

/// Result type alias using OrbitalError
pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Top-level error type for all Orbital operations
#[derive(Debug, Error)]
pub enum OrbitalError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrbitalError {
    /// Whether the caller may retry the same request unchanged.
    ///
    /// Validation failures are deterministic and will fail again; storage and io
    /// failures are transient infrastructure errors.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrbitalError::Storage(_) | OrbitalError::Io(_))
    }
}

/// A sync entry was rejected; the whole batch it belongs to is discarded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("book {book_id}: {reason}")]
pub struct ValidationError {
    pub book_id: BookId,
    pub reason: ProgressOutOfRange,
}

/// Progress value outside the accepted percentage range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("progress {0} is outside 0..=100")]
pub struct ProgressOutOfRange(pub i64);

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(err.to_string()),
            _ => StorageError::BackendError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let validation = OrbitalError::from(ValidationError {
            book_id: BookId::new("dune"),
            reason: ProgressOutOfRange(101),
        });
        assert!(!validation.is_retryable());

        let storage = OrbitalError::from(StorageError::BackendError("disk full".into()));
        assert!(storage.is_retryable());
    }

    #[test]
    fn test_validation_message_names_book() {
        let err = ValidationError {
            book_id: BookId::new("dune"),
            reason: ProgressOutOfRange(-1),
        };
        assert_eq!(err.to_string(), "book dune: progress -1 is outside 0..=100");
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(StorageError::from(io), StorageError::NotFound(_)));
    }
}
