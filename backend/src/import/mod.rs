//! Batch import: parse, validate and store books from CSV.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV bytes  │────▶│   Parser    │────▶│  Validator  │────▶│  BookStore  │
//! │ (any enc.)  │     │ (per line)  │     │  (per row)  │     │  (valid)    │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └─────────────┘
//!                                                │ invalid
//!                                                ▼
//!                                        "Row {n}: {errors}"
//! ```
//!
//! A failing row never aborts the batch and rows already stored are kept.
//! Progress goes to the [`LogBroadcaster`] passed in by the caller.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::logs::LogBroadcaster;
use crate::error::InputResult;
use crate::models::CandidateBook;
use crate::parser::{parse_books, parse_bytes, parse_csv_file, ParseResult};
use crate::store::BookStore;
use crate::validation::check;

/// Outcome of a batch import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows stored
    pub books_added: usize,
    /// One message per rejected row: `Row {n}: {errors}` (1-indexed)
    pub error_messages: Vec<String>,
}

impl ImportSummary {
    /// Human-readable summary line
    pub fn message(&self) -> String {
        if self.error_messages.is_empty() {
            format!("Successfully imported {} books", self.books_added)
        } else {
            format!(
                "Successfully imported {} books with {} errors",
                self.books_added,
                self.error_messages.len()
            )
        }
    }
}

/// Validate each candidate and store the valid ones.
///
/// Rows are numbered from 1 among the candidates, so rows dropped by the
/// parser (blank or short lines, the header) do not count.
pub fn import_batch(
    store: &BookStore,
    candidates: &[CandidateBook],
    current_year: i32,
    logs: &LogBroadcaster,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let row = index + 1;
        match check(candidate, current_year) {
            Ok(fields) => {
                store.insert(fields);
                summary.books_added += 1;
            }
            Err(errors) => {
                let message = format!("Row {}: {}", row, errors.join(", "));
                logs.warning_indent(message.clone(), 1);
                summary.error_messages.push(message);
            }
        }
    }

    summary
}

/// Parse CSV text and import it.
pub fn import_csv(store: &BookStore, csv: &str, current_year: i32, logs: &LogBroadcaster) -> ImportSummary {
    let candidates = parse_books(csv);
    run(store, &candidates, current_year, logs)
}

/// Decode uploaded bytes, parse and import them.
pub fn import_bytes(
    store: &BookStore,
    bytes: &[u8],
    current_year: i32,
    logs: &LogBroadcaster,
) -> ImportSummary {
    let parsed = parse_bytes(bytes);
    log_parsed(&parsed, logs);
    run(store, &parsed.candidates, current_year, logs)
}

/// Read a CSV file from disk and import it.
pub fn import_csv_file<P: AsRef<Path>>(
    store: &BookStore,
    path: P,
    current_year: i32,
    logs: &LogBroadcaster,
) -> InputResult<ImportSummary> {
    let parsed = parse_csv_file(path)?;
    log_parsed(&parsed, logs);
    Ok(run(store, &parsed.candidates, current_year, logs))
}

fn log_parsed(parsed: &ParseResult, logs: &LogBroadcaster) {
    logs.info(format!(
        "Parsed {} rows (encoding: {}, header: {})",
        parsed.candidates.len(),
        parsed.encoding,
        if parsed.has_header { "yes" } else { "no" }
    ));
}

fn run(
    store: &BookStore,
    candidates: &[CandidateBook],
    current_year: i32,
    logs: &LogBroadcaster,
) -> ImportSummary {
    logs.info(format!("Importing {} rows", candidates.len()));

    let summary = import_batch(store, candidates, current_year, logs);

    if summary.error_messages.is_empty() {
        logs.success(format!("{} books added", summary.books_added));
    } else {
        logs.warning(format!(
            "{} books added, {} rows rejected",
            summary.books_added,
            summary.error_messages.len()
        ));
    }

    summary
}
