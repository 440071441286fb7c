//! Input parsing for PokerNow logs and JSON hand histories.
//!
//! Three input shapes are accepted:
//! - **Delimited log**: the PokerNow CSV export with an `entry,at,order` header
//! - **Single JSON**: one object in either the simplified dialect
//!   (`{"version", "hands": [...]}`) or the Open Hand History envelope
//!   (`{"id", "ohh": {...}}`)
//! - **JSON Lines**: one such object per line
//!
//! [`detect_format`] decides which path a buffer takes.
//!
//! # Example
//!
//! ```rust
//! use pokernow2hh::parser::{detect_format, InputFormat};
//!
//! assert_eq!(detect_format(b"entry,at,order\n"), InputFormat::DelimitedLog);
//! assert_eq!(detect_format(br#"{"hands": []}"#), InputFormat::SingleJson);
//! assert_eq!(detect_format(b"{\"hands\": []}\n{\"hands\": []}"), InputFormat::JsonLines);
//! ```

mod csv_log;
mod json;
mod jsonl;

pub use csv_log::*;
pub use json::*;
pub use jsonl::*;

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

/// Shape of an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// PokerNow CSV log.
    DelimitedLog,
    /// A single JSON object.
    SingleJson,
    /// Newline-separated JSON objects.
    JsonLines,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DelimitedLog => "delimited log",
            Self::SingleJson => "JSON",
            Self::JsonLines => "JSON Lines",
        })
    }
}

/// Decide which parser handles `data`.
///
/// Anything that does not start with `{` (including empty input and
/// top-level JSON arrays) is treated as a delimited log and will be rejected
/// by its header check if it is not one. A buffer that starts with `{` is a
/// single JSON object when exactly one object decodes and nothing follows it;
/// otherwise it is JSON Lines.
pub fn detect_format(data: &[u8]) -> InputFormat {
    let trimmed = trim_ascii_whitespace(data);

    let format = if trimmed.first() != Some(&b'{') {
        InputFormat::DelimitedLog
    } else {
        let mut stream =
            serde_json::Deserializer::from_slice(trimmed).into_iter::<Map<String, Value>>();
        match stream.next() {
            Some(Ok(_)) if stream.byte_offset() == trimmed.len() => InputFormat::SingleJson,
            _ => InputFormat::JsonLines,
        }
    };

    debug!(%format, bytes = data.len(), "Detected input format");
    format
}

fn trim_ascii_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &data[start..end]
}

/// Truncate a string for preview display without splitting a character.
pub(crate) fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
