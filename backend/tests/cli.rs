//! Runs the `bookshelf` binary on temporary input files.

use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::NamedTempFile;

fn bookshelf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bookshelf"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_validate_fails_on_invalid_record() {
    let file = temp_file(
        r#"[{"title": "Dune", "author": "Frank Herbert", "publishedYear": 1965},
           {"title": "", "author": "Nobody", "publishedYear": 1965}]"#,
    );

    let output = bookshelf(&["validate", file.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Record 2 invalid"));
    assert!(stderr.contains("1 valid, 1 invalid"));
}

#[test]
fn test_validate_succeeds_on_valid_records() {
    let file = temp_file(r#"[{"title": "Emma", "author": "Jane Austen", "publishedYear": 1815}]"#);

    let output = bookshelf(&["validate", file.path().to_str().unwrap()]);

    assert!(output.status.success());
}

#[test]
fn test_import_uses_empty_store() {
    let file = temp_file("Title,Author,Year\nDune,Frank Herbert,1965\nLater,Someone,3000\n");

    let output = bookshelf(&["import", file.path().to_str().unwrap()]);

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["summary"]["booksAdded"], 1);
    assert_eq!(result["summary"]["message"], "Successfully imported 1 books with 1 errors");
    let books = result["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
}

#[test]
fn test_import_missing_file_fails() {
    let output = bookshelf(&["import", "/nonexistent/books.csv"]);
    assert_eq!(output.status.code(), Some(1));
}
