//! Real-time import log streaming via Server-Sent Events (SSE).
//!
//! Import progress is published on a broadcast channel that `/api/logs`
//! clients subscribe to. Every entry is also emitted as a `tracing` event.
//!
//! The server owns one [`LogBroadcaster`] in its state and hands it to the
//! importer; there is no process-wide channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entries kept for slow subscribers before they start lagging.
const CHANNEL_CAPACITY: usize = 100;

/// Log level for client display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level (per-row messages under a batch)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Broadcasts log entries to all connected SSE clients
#[derive(Debug)]
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Send a log entry to all subscribers
    pub fn log(&self, entry: LogEntry) {
        let line = format!("{}{}", "  ".repeat(usize::from(entry.indent)), entry.message);
        match entry.level {
            LogLevel::Info | LogLevel::Success => tracing::info!(target: "bookshelf::import", "{}", line),
            LogLevel::Warning => tracing::warn!(target: "bookshelf::import", "{}", line),
            LogLevel::Error => tracing::error!(target: "bookshelf::import", "{}", line),
        }

        // No subscribers is not an error
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }

    pub fn warning_indent(&self, msg: impl Into<String>, indent: u8) {
        self.log(LogEntry::warning(msg).with_indent(indent));
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
