//! Bounded, insertion-ordered log history.

use std::collections::VecDeque;

use econet_proto::LogEntry;

/// Hard cap on retained log entries.
pub const MAX_LOGS: usize = 200;

/// The most recent device log lines, oldest first.
///
/// Appending beyond the capacity evicts exactly one entry, the oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    /// A buffer holding at most [`MAX_LOGS`] entries.
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOGS)
    }

    /// A buffer with a custom cap (at least one entry).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry`, returning the evicted entry if the buffer was full.
    pub fn push(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use econet_proto::LogLevel;

    #[test]
    fn test_201_lines_keep_the_newest_200() {
        // Arrange
        let mut buf = LogBuffer::new();

        // Act
        for n in 0..201 {
            buf.push(LogEntry::new(format!("line {n}")));
        }

        // Assert
        assert_eq!(buf.len(), 200);
        assert_eq!(buf.get(0).unwrap().line, "line 1");
        assert_eq!(buf.get(199).unwrap().line, "line 200");
    }

    #[test]
    fn test_push_returns_evicted_entry_only_when_full() {
        let mut buf = LogBuffer::with_capacity(2);
        assert!(buf.push(LogEntry::new("a")).is_none());
        assert!(buf.push(LogEntry::new("b")).is_none());

        let evicted = buf.push(LogEntry::new("c"));

        assert_eq!(evicted.map(|e| e.line), Some("a".to_string()));
        let lines: Vec<_> = buf.iter().map(|e| e.line.as_str()).collect();
        assert_eq!(lines, ["b", "c"]);
    }

    #[test]
    fn test_entries_keep_their_classification() {
        let mut buf = LogBuffer::new();
        for line in ["E boom", "W careful", "I ok", "ok"] {
            buf.push(LogEntry::new(line));
        }
        let levels: Vec<_> = buf.iter().map(|e| e.level).collect();
        assert_eq!(
            levels,
            [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Other]
        );
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut buf = LogBuffer::with_capacity(0);
        buf.push(LogEntry::new("x"));
        buf.push(LogEntry::new("y"));
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.get(0).unwrap().line, "y");
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = LogBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), MAX_LOGS);
    }
}
