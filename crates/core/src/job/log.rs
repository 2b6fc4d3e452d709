//! Per-job execution log returned to the caller.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Severity of a log entry. Only affects the `tracing` mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A single timestamped entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// Renders as `YYYY-MM-DD HH:MM:SS.mmm <message>`.
    pub fn render(&self) -> String {
        format!(
            "{} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.message
        )
    }
}

/// Append-only, ordered log owned by one running job.
///
/// Every entry is also emitted through `tracing`, so the host's own log
/// stream carries the same lines as the response.
#[derive(Debug, Default)]
pub struct ExecutionLog {
    entries: Vec<LogEntry>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        match level {
            LogLevel::Info => info!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the log into rendered lines, in insertion order.
    pub fn into_lines(self) -> Vec<String> {
        self.entries.iter().map(LogEntry::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entries_keep_order() {
        let mut log = ExecutionLog::new();
        log.info("first");
        log.warn("second");
        log.error("third");

        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(log.entries()[1].level, LogLevel::Warn);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_render_format() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2023, 5, 1, 10, 0, 7).unwrap()
                + chrono::Duration::milliseconds(42),
            level: LogLevel::Info,
            message: "hello".to_string(),
        };
        assert_eq!(entry.render(), "2023-05-01 10:00:07.042 hello");
    }

    #[test]
    fn test_into_lines() {
        let mut log = ExecutionLog::new();
        assert!(log.is_empty());
        log.info("created");
        let lines = log.into_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" created"));
    }
}
