//! JSON Lines adapter: one hand-history object per line.

use std::io::BufRead;

use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use super::{read_json_value, truncate_preview};
use crate::error::{ConvertError, Result};
use crate::model::{Hand, SkipReason, SkippedHandInfo};

/// Maximum number of lines read from one JSON Lines input.
pub const MAX_JSONL_LINES: usize = 100_000;

/// Hands decoded from a JSON Lines input plus diagnostics for bad lines.
#[derive(Debug, Clone, Default)]
pub struct JsonLinesOutput {
    /// Hands from every line that decoded.
    pub hands: Vec<Hand>,
    /// One diagnostic per line that failed.
    pub skipped: Vec<SkippedHandInfo>,
    /// Lines read, blank lines included.
    pub lines_processed: usize,
    /// Whether reading stopped at the line cap.
    pub truncated: bool,
}

/// Reader for JSON Lines hand histories.
#[derive(Debug, Clone)]
pub struct JsonLinesReader {
    max_lines: usize,
}

impl JsonLinesReader {
    /// Create a reader with the default line cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: MAX_JSONL_LINES,
        }
    }

    /// Set the line cap.
    #[must_use]
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Decode every line, turning failures into [`SkipReason::InvalidRecord`] diagnostics.
    ///
    /// Only an I/O failure of the reader aborts.
    #[instrument(skip(self, reader), level = "debug")]
    pub fn read<R: BufRead>(&self, reader: R) -> Result<JsonLinesOutput> {
        let mut output = JsonLinesOutput::default();

        for (index, line_result) in reader.split(b'\n').enumerate() {
            if index >= self.max_lines {
                warn!(max_lines = self.max_lines, "Line cap reached, ignoring the rest of the input");
                output.truncated = true;
                break;
            }
            let line_num = index + 1;
            output.lines_processed += 1;

            let bytes = line_result
                .map_err(|e| ConvertError::io(format!("Failed to read line {line_num}"), e))?;
            let line = match std::str::from_utf8(&bytes) {
                Ok(line) => line,
                Err(e) => {
                    let lossy = String::from_utf8_lossy(&bytes);
                    let lossy = lossy.trim();
                    warn!(line = line_num, error = %e, "Skipping line that is not valid UTF-8");
                    output.skipped.push(invalid_record(
                        format!("line {line_num}: invalid UTF-8: {e}"),
                        lossy.to_string(),
                    ));
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match decode_line(trimmed, line_num) {
                Ok(hands) => {
                    trace!(line = line_num, hands = hands.len(), "Decoded line");
                    output.hands.extend(hands);
                }
                Err(e) => {
                    warn!(
                        line = line_num,
                        error = %e,
                        preview = %truncate_preview(trimmed, 80),
                        "Skipping invalid record"
                    );
                    output
                        .skipped
                        .push(invalid_record(format!("line {line_num}: {e}"), trimmed.to_string()));
                }
            }
        }

        debug!(
            hands = output.hands.len(),
            lines = output.lines_processed,
            skipped = output.skipped.len(),
            "JSON Lines complete"
        );
        Ok(output)
    }
}

impl Default for JsonLinesReader {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_record(detail: String, raw: String) -> SkippedHandInfo {
    SkippedHandInfo {
        hand_id: String::new(),
        hand_number: String::new(),
        reason: SkipReason::InvalidRecord,
        detail,
        player_count: 0,
        raw_input: vec![raw],
    }
}

fn decode_line(line: &str, line_num: usize) -> Result<Vec<Hand>> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| ConvertError::json(format!("line {line_num}"), e))?;
    if !value.is_object() {
        return Err(ConvertError::format(format!(
            "line {line_num} is not a JSON object"
        )));
    }
    read_json_value(value, line_num)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND: &str = r#"{"hands":[{"handId":"1","startTime":"2024-05-01T10:00:00Z","players":[{"seatNumber":1,"name":"a","stack":100},{"seatNumber":2,"name":"b","stack":100}],"heroCards":["Ah","Kd"],"actions":[]}]}"#;

    #[test]
    fn test_reads_each_line() {
        let input = format!("{HAND}\n\n{HAND}\n");
        let output = JsonLinesReader::new().read(input.as_bytes()).unwrap();
        assert_eq!(output.hands.len(), 2);
        assert!(output.skipped.is_empty());
        assert_eq!(output.lines_processed, 3);
    }

    #[test]
    fn test_bad_lines_become_diagnostics() {
        let input = format!("{HAND}\n{{broken\n[1]\n{HAND}\n");
        let output = JsonLinesReader::new().read(input.as_bytes()).unwrap();

        assert_eq!(output.hands.len(), 2);
        assert_eq!(output.skipped.len(), 2);
        assert_eq!(output.skipped[0].reason, SkipReason::InvalidRecord);
        assert_eq!(output.skipped[0].raw_input, vec!["{broken".to_string()]);
        assert!(output.skipped[1].detail.starts_with("line 3"), "{}", output.skipped[1].detail);
    }

    #[test]
    fn test_unknown_action_skips_only_that_line() {
        let bad = HAND.replace(r#""actions":[]"#, r#""actions":[{"player":"a","actionType":"dance","street":"preflop"}]"#);
        let input = format!("{bad}\n{HAND}\n");
        let output = JsonLinesReader::new().read(input.as_bytes()).unwrap();
        assert_eq!(output.hands.len(), 1);
        assert_eq!(output.skipped.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut input = Vec::new();
        input.extend_from_slice(HAND.as_bytes());
        input.extend_from_slice(b"\n{\"hands\": \xff\xfe}\r\n");
        input.extend_from_slice(HAND.as_bytes());
        input.push(b'\n');

        let output = JsonLinesReader::new().read(input.as_slice()).unwrap();

        assert_eq!(output.hands.len(), 2);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.lines_processed, 3);
        let skipped = &output.skipped[0];
        assert_eq!(skipped.reason, SkipReason::InvalidRecord);
        assert!(skipped.detail.starts_with("line 2: invalid UTF-8"), "{}", skipped.detail);
        assert_eq!(skipped.raw_input, vec!["{\"hands\": \u{fffd}\u{fffd}}".to_string()]);
    }

    #[test]
    fn test_line_cap() {
        let input = format!("{HAND}\n{HAND}\n{HAND}\n");
        let output = JsonLinesReader::new()
            .with_max_lines(2)
            .read(input.as_bytes())
            .unwrap();
        assert_eq!(output.hands.len(), 2);
        assert!(output.truncated);
    }
}
