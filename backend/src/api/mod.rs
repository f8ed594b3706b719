//! HTTP API module.
//!
//! This module provides the HTTP server, upload handling and API types for
//! the bookshelf backend.

pub mod server;
pub mod types;
pub mod logs;
pub mod upload;

pub use server::{router, start_server, AppState};
pub use types::*;
pub use logs::*;
