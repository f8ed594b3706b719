//! REST API types and the error-to-response boundary.
//!
//! [`ApiError`] is the only place where errors become HTTP status codes:
//!
//! | Error             | Status |
//! |-------------------|--------|
//! | `Validation`      | 400    |
//! | `BadRequest`      | 400    |
//! | `MalformedUpload` | 400 (413 when too large) |
//! | `NotFound`        | 404    |
//! | `Internal`        | 500    |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, UploadError};
use crate::import::ImportSummary;

/// Response sent after a bulk CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// e.g. "Successfully imported 2 books with 1 errors"
    pub message: String,
    pub books_added: usize,
    /// `Row {n}: {errors}` for every rejected row
    pub error_messages: Vec<String>,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        ImportResponse {
            message: summary.message(),
            books_added: summary.books_added,
            error_messages: summary.error_messages,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: Vec::new() }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Create an error response
pub fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedUpload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client. Internal details are logged, never returned.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(errors) => {
                ErrorBody::new("Validation failed").with_details(errors.clone())
            }
            ApiError::NotFound(_) => ErrorBody::new("Book not found"),
            ApiError::Internal(_) => ErrorBody::new("Internal server error"),
            other => ErrorBody::new(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        error_response(status, self.body())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MalformedUpload(UploadError::MissingFile).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MalformedUpload(UploadError::TooLarge { limit: 1 }).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::Internal("boom".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_body_lists_errors() {
        let body = ApiError::Validation(vec!["a".into(), "b".into()]).body();
        assert_eq!(body.error, "Validation failed");
        assert_eq!(body.details, vec!["a", "b"]);
    }

    #[test]
    fn test_internal_body_hides_detail() {
        let body = ApiError::Internal("db password is hunter2".into()).body();
        assert_eq!(body, ErrorBody::new("Internal server error"));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_import_response_from_summary() {
        let response = ImportResponse::from(ImportSummary {
            books_added: 2,
            error_messages: vec!["Row 2: bad".into()],
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["booksAdded"], 2);
        assert_eq!(json["errorMessages"][0], "Row 2: bad");
        assert_eq!(json["message"], "Successfully imported 2 books with 1 errors");
    }
}
