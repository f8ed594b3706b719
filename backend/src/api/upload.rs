//! Extraction and checks for CSV file uploads.
//!
//! The upload is a `multipart/form-data` body whose `file` field holds the
//! CSV. The field must declare a CSV content type and stay within the
//! configured size limit; anything else is rejected before parsing.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::error::{UploadError, UploadResult};

/// Multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

/// Accepted content types. Browsers on Windows label `.csv` files as Excel.
const CSV_CONTENT_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel"];

/// An uploaded CSV file, fully read into memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Whether a `Content-Type` value denotes CSV (parameters ignored).
pub fn is_csv_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    CSV_CONTENT_TYPES.contains(&essence.as_str())
}

pub fn check_content_type(content_type: Option<&str>) -> UploadResult<()> {
    match content_type {
        Some(ct) if is_csv_content_type(ct) => Ok(()),
        Some(ct) => Err(UploadError::UnsupportedContentType(ct.to_string())),
        None => Err(UploadError::UnsupportedContentType("none".to_string())),
    }
}

pub fn check_size(size: usize, limit: usize) -> UploadResult<()> {
    if size > limit {
        Err(UploadError::TooLarge { limit })
    } else {
        Ok(())
    }
}

/// Read the `file` field of a multipart body.
///
/// Other fields are skipped. The first `file` field wins.
pub async fn read_csv_upload(multipart: &mut Multipart, limit: usize) -> UploadResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        check_content_type(field.content_type())?;
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        check_size(bytes.len(), limit)?;

        return Ok(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(UploadError::MissingFile)
}

/// The body limit layer surfaces oversized bodies as multipart errors.
fn multipart_error(err: MultipartError, limit: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { limit }
    } else {
        UploadError::Multipart(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_content_types() {
        assert!(is_csv_content_type("text/csv"));
        assert!(is_csv_content_type("text/csv; charset=utf-8"));
        assert!(is_csv_content_type("TEXT/CSV"));
        assert!(is_csv_content_type("application/vnd.ms-excel"));
        assert!(!is_csv_content_type("application/json"));
        assert!(!is_csv_content_type("text/plain"));
        assert!(!is_csv_content_type(""));
    }

    #[test]
    fn test_check_content_type() {
        assert!(check_content_type(Some("text/csv")).is_ok());
        assert_eq!(
            check_content_type(Some("image/png")),
            Err(UploadError::UnsupportedContentType("image/png".into()))
        );
        assert!(matches!(
            check_content_type(None),
            Err(UploadError::UnsupportedContentType(_))
        ));
    }

    #[test]
    fn test_check_size() {
        let limit = 1024 * 1024;
        assert!(check_size(0, limit).is_ok());
        assert!(check_size(limit, limit).is_ok());
        assert_eq!(check_size(limit + 1, limit), Err(UploadError::TooLarge { limit }));
    }
}
