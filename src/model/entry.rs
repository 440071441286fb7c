//! Raw log entries produced by the delimited-log tokenizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a PokerNow log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Free-text event content.
    pub text: String,
    /// Event timestamp, normalized to UTC.
    pub at: DateTime<Utc>,
    /// Site-assigned ordering key.
    pub order: i64,
}

impl LogEntry {
    /// Create a new log entry.
    pub fn new(text: impl Into<String>, at: DateTime<Utc>, order: i64) -> Self {
        Self {
            text: text.into(),
            at,
            order,
        }
    }
}
