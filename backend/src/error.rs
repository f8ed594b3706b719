//! Error types for the Bookshelf service.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`InputError`] - Reading CSV or JSON input files
//! - [`StoreError`] - Record store lookups
//! - [`UploadError`] - Rejected bulk-import uploads
//! - [`ServerError`] - Startup and configuration failures
//! - [`ApiError`] - Boundary errors, mapped to HTTP status codes by the API layer
//!
//! Validation problems are not errors at the component level: the validator
//! returns a list of messages and only the boundary turns it into
//! [`ApiError::Validation`].

use thiserror::Error;

// =============================================================================
// Input File Errors
// =============================================================================

/// Errors while reading input files from disk.
///
/// CSV parsing itself never fails: malformed rows are dropped or reported
/// per row by the importer.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A JSON input file is not an array of book objects.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the in-memory record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("Book not found: {0}")]
    NotFound(String),
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Reasons a bulk-import upload is rejected before parsing begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The multipart body had no `file` field.
    #[error("No file uploaded")]
    MissingFile,

    /// The file exceeds the configured size cap.
    #[error("File too large (limit is {limit} bytes)")]
    TooLarge { limit: usize },

    /// The declared content type is not CSV.
    #[error("Only CSV files are allowed (got '{0}')")]
    UnsupportedContentType(String),

    /// The multipart body could not be read.
    #[error("Multipart error: {0}")]
    Multipart(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// =============================================================================
// API Errors (boundary)
// =============================================================================

/// Errors surfaced to HTTP callers.
///
/// Each variant maps to one status code; see `ApiError::status`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more field-level violations.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Referenced id does not exist.
    #[error("Book not found: {0}")]
    NotFound(String),

    /// Upload absent, oversized or not CSV.
    #[error(transparent)]
    MalformedUpload(#[from] UploadError),

    /// Request body could not be decoded.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Anything else.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input file operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for upload checks.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // StoreError -> ApiError
        let store_err = StoreError::NotFound("abc".into());
        let api_err: ApiError = store_err.into();
        assert!(matches!(api_err, ApiError::NotFound(ref id) if id == "abc"));

        // UploadError -> ApiError
        let upload_err = UploadError::MissingFile;
        let api_err: ApiError = upload_err.into();
        assert_eq!(api_err.to_string(), "No file uploaded");
    }

    #[test]
    fn test_validation_error_format() {
        let err = ApiError::Validation(vec![
            "Title is required and must be a string".into(),
            "Author is required and must be a string".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed"));
        assert!(msg.contains("Title is required"));
        assert!(msg.contains("Author is required"));
    }

    #[test]
    fn test_input_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: InputError = json_err.into();
        assert!(err.to_string().starts_with("Invalid JSON input"));
    }

    #[test]
    fn test_too_large_message() {
        let err = UploadError::TooLarge { limit: 1_048_576 };
        assert_eq!(err.to_string(), "File too large (limit is 1048576 bytes)");
    }
}
