//! Device log lines and their severity.
//!
//! The firmware's logger prefixes each line with a single severity letter and
//! a space (`"E "`, `"W "`, `"I "`).  Lines from other sources (the simulator,
//! bootloader chatter) carry no prefix and are classified as
//! [`LogLevel::Other`].

use serde::{Deserialize, Serialize};

/// Severity of a device log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Other,
}

impl LogLevel {
    /// Derives the level from the line's two-character prefix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use econet_proto::LogLevel;
    ///
    /// assert_eq!(LogLevel::classify("E boom"), LogLevel::Error);
    /// assert_eq!(LogLevel::classify("Eboom"), LogLevel::Other);
    /// ```
    pub fn classify(line: &str) -> LogLevel {
        if line.starts_with("E ") {
            LogLevel::Error
        } else if line.starts_with("W ") {
            LogLevel::Warn
        } else if line.starts_with("I ") {
            LogLevel::Info
        } else {
            LogLevel::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Other => "other",
        }
    }
}

/// A classified log line, as held by the client store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub line: String,
}

impl LogEntry {
    /// Classifies `line` and wraps it.
    pub fn new(line: impl Into<String>) -> Self {
        let line = line.into();
        Self {
            level: LogLevel::classify(&line),
            line,
        }
    }
}
