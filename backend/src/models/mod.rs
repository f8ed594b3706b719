//! Domain models for the Bookshelf service.
//!
//! - [`Book`] - A stored book record with its generated id
//! - [`BookFields`] - The three content fields of a book, already validated
//! - [`CandidateBook`] - Loosely typed content fields as received from a
//!   request body or a CSV row, before validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Book
// =============================================================================

/// A book record held by the store.
///
/// Serialized with camelCase keys (`publishedYear`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Generated at creation, never changes.
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

impl Book {
    /// Build a record from an id and validated fields.
    pub fn from_fields(id: impl Into<String>, fields: BookFields) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            author: fields.author,
            published_year: fields.published_year,
        }
    }

    /// Content fields of this record, without the id.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            published_year: self.published_year,
        }
    }

    /// Replace all content fields at once, keeping the id.
    pub fn replace_fields(&mut self, fields: BookFields) {
        self.title = fields.title;
        self.author = fields.author;
        self.published_year = fields.published_year;
    }
}

// =============================================================================
// Book Fields
// =============================================================================

/// Typed content fields of a book.
///
/// The store takes these as given. Build them with
/// [`crate::validation::check`] to have the validation rules applied.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

// =============================================================================
// Candidate Book
// =============================================================================

/// Unvalidated book content.
///
/// Every field is an arbitrary JSON value and may be missing (`null`):
/// request bodies are accepted as-is and the validator decides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateBook {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub author: Value,
    #[serde(default)]
    pub published_year: Value,
}

impl CandidateBook {
    pub fn new(
        title: impl Into<Value>,
        author: impl Into<Value>,
        published_year: impl Into<Value>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published_year: published_year.into(),
        }
    }

    /// Read a candidate from a JSON object.
    ///
    /// Arrays are refused even though the derived `Deserialize` would match
    /// them to fields by position, and so are scalars.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "expected a JSON object",
            ));
        }
        serde_json::from_value(value)
    }
}

impl From<BookFields> for CandidateBook {
    fn from(fields: BookFields) -> Self {
        Self::new(fields.title, fields.author, fields.published_year)
    }
}
