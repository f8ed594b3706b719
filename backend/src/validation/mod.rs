//! Field validation for candidate books.
//!
//! Rules are checked independently and every failing rule contributes one
//! message, in this order:
//!
//! 1. `title` must be a non-empty string
//! 2. `author` must be a non-empty string
//! 3. `publishedYear` must be an integer (or a string holding one) in
//!    `1..=current_year`
//!
//! The reference year is always passed in. [`current_year`] reads the clock
//! and is meant for the HTTP boundary only.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookshelf::{validate, CandidateBook};
//!
//! let candidate = CandidateBook::new("Dune", "Frank Herbert", 1965);
//! assert!(validate(&candidate, 2024).is_empty());
//!
//! let errors = validate(&CandidateBook::default(), 2024);
//! assert_eq!(errors.len(), 3);
//! ```

use chrono::Datelike;
use serde_json::Value;
use std::path::Path;

use crate::error::InputResult;
use crate::models::{BookFields, CandidateBook};

/// Message for a missing or non-string title.
pub const TITLE_ERROR: &str = "Title is required and must be a string";

/// Message for a missing or non-string author.
pub const AUTHOR_ERROR: &str = "Author is required and must be a string";

/// Message for an unparsable or out-of-range year.
pub fn year_error(current_year: i32) -> String {
    format!("Published year must be a valid year between 1 and {}", current_year)
}

/// Current calendar year (UTC).
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Validate a candidate, returning every violated rule.
///
/// An empty vector means the candidate is acceptable.
pub fn validate(candidate: &CandidateBook, current_year: i32) -> Vec<String> {
    let mut errors = Vec::new();

    if text_field(&candidate.title).is_none() {
        errors.push(TITLE_ERROR.to_string());
    }
    if text_field(&candidate.author).is_none() {
        errors.push(AUTHOR_ERROR.to_string());
    }
    if year_in_range(&candidate.published_year, current_year).is_none() {
        errors.push(year_error(current_year));
    }

    errors
}

/// Quick check: true when [`validate`] would return no errors.
pub fn is_valid(candidate: &CandidateBook, current_year: i32) -> bool {
    validate(candidate, current_year).is_empty()
}

/// Validate and promote a candidate to typed fields.
pub fn check(candidate: &CandidateBook, current_year: i32) -> Result<BookFields, Vec<String>> {
    let title = text_field(&candidate.title);
    let author = text_field(&candidate.author);
    let year = year_in_range(&candidate.published_year, current_year);

    match (title, author, year) {
        (Some(title), Some(author), Some(published_year)) => Ok(BookFields {
            title: title.to_string(),
            author: author.to_string(),
            published_year,
        }),
        _ => Err(validate(candidate, current_year)),
    }
}

/// A record that failed validation, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub record: usize,
    pub errors: Vec<String>,
}

/// Outcome of validating a list of candidates without storing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: usize,
    pub failures: Vec<RecordFailure>,
}

impl ValidationReport {
    /// True when no record failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn invalid(&self) -> usize {
        self.failures.len()
    }
}

/// Validate every candidate and collect the failures.
pub fn validate_all(candidates: &[CandidateBook], current_year: i32) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let errors = validate(candidate, current_year);
        if errors.is_empty() {
            report.valid += 1;
        } else {
            report.failures.push(RecordFailure { record: index + 1, errors });
        }
    }

    report
}

/// Validate a JSON file holding an array of book objects.
pub fn validate_file<P: AsRef<Path>>(path: P, current_year: i32) -> InputResult<ValidationReport> {
    let content = std::fs::read_to_string(path)?;
    let values: Vec<Value> = serde_json::from_str(&content)?;
    let candidates = values
        .into_iter()
        .map(CandidateBook::from_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(validate_all(&candidates, current_year))
}

/// Interpret a loosely typed value as an integer.
///
/// Accepts JSON integers and strings holding an integer (surrounding
/// whitespace allowed). Fractions, booleans and everything else are rejected.
pub fn parse_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn text_field(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn year_in_range(value: &Value, current_year: i32) -> Option<i32> {
    let year = parse_year(value)?;
    if year > 0 && year <= i64::from(current_year) {
        i32::try_from(year).ok()
    } else {
        None
    }
}
