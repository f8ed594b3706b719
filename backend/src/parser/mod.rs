//! CSV parser for bulk book imports.
//!
//! The format is deliberately simple: one book per line, fields split on
//! every comma, no quoting. The first line is treated as a header when it
//! mentions both `title` and `author` (case-insensitive).
//!
//! ```text
//! Title,Author,Year          <- skipped (header)
//! Dune, Frank Herbert, 1965  -> { title: "Dune", author: "Frank Herbert", publishedYear: 1965 }
//!                            <- skipped (blank)
//! Only,Two                   <- dropped (fewer than 3 fields)
//! ```
//!
//! Uploaded bytes are decoded first; the encoding is auto-detected so
//! spreadsheet exports in Latin-1 or Windows-1252 import cleanly.

use serde_json::Value;
use std::path::Path;

use crate::error::InputResult;
use crate::models::CandidateBook;

/// Minimum number of comma-separated fields a row needs to become a candidate.
pub const MIN_FIELDS: usize = 3;

/// Result of parsing raw bytes, with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Candidate books, in input order
    pub candidates: Vec<CandidateBook>,
    /// Detected encoding
    pub encoding: String,
    /// Whether the first line was skipped as a header
    pub has_header: bool,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels fall back to lossy UTF-8. A leading byte-order mark is removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding_rs::Encoding::for_label(encoding.as_bytes()) {
        Some(enc) if enc != encoding_rs::UTF_8 => enc.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Whether a line looks like the `title,author,...` header.
pub fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("title") && lower.contains("author")
}

/// Parse CSV text into candidate books.
///
/// Never fails: blank lines and lines with fewer than [`MIN_FIELDS`]
/// fields are skipped silently. Extra fields are ignored.
///
/// # Example
/// ```ignore
/// use bookshelf::parse_books;
///
/// let candidates = parse_books("Title,Author,Year\nDune,Frank Herbert,1965");
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(candidates[0].title, "Dune");
/// ```
pub fn parse_books(csv: &str) -> Vec<CandidateBook> {
    let lines: Vec<&str> = csv.split('\n').collect();

    let start = match lines.first() {
        Some(first) if is_header(first) => 1,
        _ => 0,
    };

    lines[start..]
        .iter()
        .filter_map(|line| parse_line(line))
        .collect()
}

/// Decode raw upload bytes and parse them.
pub fn parse_bytes(bytes: &[u8]) -> ParseResult {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    let has_header = content.split('\n').next().is_some_and(is_header);
    let candidates = parse_books(&content);

    ParseResult {
        candidates,
        encoding,
        has_header,
    }
}

/// Read and parse a CSV file from disk.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> InputResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(parse_bytes(&bytes))
}

fn parse_line(line: &str) -> Option<CandidateBook> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    Some(CandidateBook::new(fields[0], fields[1], year_value(fields[2])))
}

/// Integer when the text parses, otherwise the raw text so the
/// validator can report it.
fn year_value(raw: &str) -> Value {
    match raw.parse::<i64>() {
        Ok(year) => Value::from(year),
        Err(_) => Value::from(raw),
    }
}
