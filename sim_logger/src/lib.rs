//! # Simulation Logger
//!
//! This crate implements structured logging for the simulator.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Nothing in the simulation core prints: entries are collected in memory
//! and the host decides where they go.

use core_types::{ProcessId, Ticks};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source process (if any)
    pub source: Option<ProcessId>,
    /// Simulated time of the entry (if known)
    pub tick: Option<Ticks>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            tick: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source process
    pub fn with_source(mut self, source: ProcessId) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the simulated time
    pub fn at_tick(mut self, tick: Ticks) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(tick) = self.tick {
            write!(f, " t={}", tick)?;
        }
        if let Some(source) = self.source {
            write!(f, " {}", source)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// In-memory leveled logger
///
/// Entries below the minimum level are dropped on record.
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    entries: Vec<LogEntry>,
}

impl Logger {
    /// Creates a logger that keeps entries at or above `min_level`
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            entries: Vec::new(),
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Returns true if entries at `level` would be kept
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Records an entry
    pub fn record(&mut self, entry: LogEntry) {
        if self.enabled(entry.level) {
            self.entries.push(entry);
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Debug, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, message));
    }

    /// Returns all recorded entries
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Removes and returns all recorded entries
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Counts entries at exactly `level`
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.tick.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source() {
        let entry = LogEntry::new(LogLevel::Info, "test").with_source(ProcessId::new(2));
        assert_eq!(entry.source, Some(ProcessId::new(2)));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test")
            .with_field("key1", "value1")
            .with_field("cpu_done", 12);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields[0].0, "key1");
        assert_eq!(entry.field("cpu_done"), Some("12"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry::new(LogLevel::Warn, "budget exhausted")
            .at_tick(100)
            .with_field("completed", 2);
        assert_eq!(entry.to_string(), "[WARN] t=100 budget exhausted completed=2");

        let entry = LogEntry::new(LogLevel::Debug, "blocked").with_source(ProcessId::new(1));
        assert_eq!(entry.to_string(), "[DEBUG] Process(1) blocked");
    }

    #[test]
    fn test_logger_filters_below_min_level() {
        let mut logger = Logger::new(LogLevel::Info);
        logger.debug("dropped");
        logger.info("kept");
        logger.error("kept too");

        assert_eq!(logger.entries().len(), 2);
        assert_eq!(logger.count_at(LogLevel::Debug), 0);
        assert_eq!(logger.count_at(LogLevel::Error), 1);
    }

    #[test]
    fn test_logger_drain() {
        let mut logger = Logger::new(LogLevel::Debug);
        logger.warn("one");
        let drained = logger.drain();
        assert_eq!(drained.len(), 1);
        assert!(logger.entries().is_empty());
    }
}
