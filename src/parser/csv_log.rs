//! Tokenizer for the PokerNow delimited log export.
//!
//! The export is a CSV file with the header `entry,at,order`, one event per
//! row, newest event first.

use std::io::Read;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, instrument};

use crate::error::{ConvertError, Result};
use crate::model::LogEntry;

/// Column names the export must carry, in order.
pub const LOG_HEADER: [&str; 3] = ["entry", "at", "order"];

/// Read a PokerNow log and return its entries in chronological order.
///
/// Fails on a header other than `entry,at,order`, on rows without exactly
/// three columns, and on unparseable timestamps or order keys. Entries are
/// reversed from file order; the order keys are assumed, not checked, to
/// increase after reversal.
#[instrument(skip(reader), level = "debug")]
pub fn read_log<R: Read>(reader: R) -> Result<Vec<LogEntry>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    validate_header(&header)?;

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        entries.push(parse_row(&record, line)?);
    }

    entries.reverse();
    debug!(entries = entries.len(), "Tokenized log");
    Ok(entries)
}

fn validate_header(header: &StringRecord) -> Result<()> {
    if header.iter().eq(LOG_HEADER) {
        return Ok(());
    }
    let found: Vec<&str> = header.iter().collect();
    Err(ConvertError::format(format!(
        "invalid log header: expected [{}], got [{}]",
        LOG_HEADER.join(","),
        found.join(",")
    )))
}

fn parse_row(record: &StringRecord, line: usize) -> Result<LogEntry> {
    if record.len() != LOG_HEADER.len() {
        return Err(ConvertError::format(format!(
            "invalid log row at line {line}: expected 3 columns, got {}",
            record.len()
        )));
    }

    let at = DateTime::parse_from_rfc3339(&record[1])
        .map_err(|e| {
            ConvertError::parse(line, "timestamp", format!("{:?}: {e}", &record[1]))
        })?
        .with_timezone(&Utc);

    let order = record[2].parse::<i64>().map_err(|e| {
        ConvertError::parse(line, "order", format!("{:?}: {e}", &record[2]))
    })?;

    Ok(LogEntry::new(&record[0], at, order))
}
