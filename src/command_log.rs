//! Bounded, newest-first history of recognized commands.

use std::collections::VecDeque;

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

/// Default number of entries retained.
pub const DEFAULT_LOG_CAPACITY: usize = 10;

const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// A single timestamped command description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLogEntry {
    /// Wall-clock time, truncated to whole seconds.
    pub timestamp: OffsetDateTime,
    pub description: String,
}

impl CommandLogEntry {
    pub fn new(timestamp: OffsetDateTime, description: impl Into<String>) -> Self {
        let timestamp = timestamp.replace_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            description: description.into(),
        }
    }

    /// Render as `[HH:MM:SS] description`.
    pub fn display_line(&self) -> String {
        let time = self
            .timestamp
            .format(TIME_FORMAT)
            .unwrap_or_else(|_| "--:--:--".to_string());
        format!("[{time}] {}", self.description)
    }
}

/// Fixed-capacity log; pushing past capacity evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct CommandLog {
    entries: VecDeque<CommandLogEntry>,
    capacity: usize,
}

impl CommandLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a description stamped with the current local time.
    pub fn record(&mut self, description: impl Into<String>) {
        self.push(CommandLogEntry::new(
            crate::logging::now_local_or_utc(),
            description,
        ));
    }

    pub fn push(&mut self, entry: CommandLogEntry) {
        tracing::info!("{}", entry.description);
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &CommandLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&CommandLogEntry> {
        self.entries.front()
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
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}
