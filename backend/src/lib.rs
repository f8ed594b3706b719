//! # Bookshelf - In-memory book catalogue with CSV bulk import
//!
//! Bookshelf keeps book records (title, author, published year) in memory
//! and exposes them over a small JSON REST API. Books can be created one by
//! one or imported in bulk from a CSV upload.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV / JSON │────▶│   Parser    │────▶│  Validator  │────▶│  BookStore  │
//! │   request   │     │ (CSV only)  │     │  (per row)  │     │ (in-memory) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookshelf::{import_csv, BookStore, LogBroadcaster};
//!
//! let store = BookStore::new();
//! let logs = LogBroadcaster::new();
//! let summary = import_csv(&store, "title,author,year\nDune,Frank Herbert,1965", 2024, &logs);
//! assert_eq!(summary.books_added, 1);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Domain models (Book, BookFields, CandidateBook)
//! - [`validation`] - Field validation rules
//! - [`parser`] - CSV parsing with encoding detection
//! - [`import`] - Batch import orchestration
//! - [`store`] - In-memory book store
//! - [`config`] - Server configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Validation
pub mod validation;

// Parsing
pub mod parser;

// Import
pub mod import;

// Storage
pub mod store;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ApiError, InputError, ServerError, StoreError, UploadError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Book, BookFields, CandidateBook};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check, current_year, is_valid, validate, validate_all, validate_file, RecordFailure,
    ValidationReport,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    parse_books,
    parse_bytes,
    parse_csv_file,
    detect_encoding,
    decode_content,
    ParseResult,
};

// =============================================================================
// Re-exports - Import
// =============================================================================

pub use import::{import_batch, import_bytes, import_csv, import_csv_file, ImportSummary};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::BookStore;

// =============================================================================
// Re-exports - Config & API
// =============================================================================

pub use config::ServerConfig;

pub use api::types::{ImportResponse, ErrorBody};
pub use api::logs::LogBroadcaster;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
