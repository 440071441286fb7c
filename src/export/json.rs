//! JSON export of reconstructed hands.
//!
//! Serializes the structured [`Hand`] values, optionally together with the
//! skip diagnostics of the run, for inspection and scripting.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Hand, SkippedHandInfo};

use super::{ExportOptions, HandExporter};

/// JSON exporter for reconstructed hands.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    /// Pretty-print the JSON output.
    pretty: bool,
    /// Wrap hands in an envelope with metadata.
    use_envelope: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    /// Create a new JSON exporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pretty: false,
            use_envelope: true,
        }
    }

    /// Enable pretty-printing.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Use envelope wrapper. Without it the output is a bare array of hands.
    #[must_use]
    pub fn with_envelope(mut self, use_envelope: bool) -> Self {
        self.use_envelope = use_envelope;
        self
    }

    /// Write hands and the diagnostics of the hands that were dropped.
    pub fn export_report<W: Write>(
        &self,
        hands: &[Hand],
        skipped: &[SkippedHandInfo],
        writer: &mut W,
    ) -> Result<()> {
        let report = HandsExport {
            version: crate::VERSION,
            hand_count: hands.len(),
            hands,
            skipped_count: skipped.len(),
            skipped,
        };
        self.write_json(writer, &report)
    }

    /// Write the diagnostics alone, as an array.
    pub fn export_skipped<W: Write>(
        &self,
        skipped: &[SkippedHandInfo],
        writer: &mut W,
    ) -> Result<()> {
        self.write_json(writer, &skipped)
    }

    fn write_json<W: Write, T: Serialize + ?Sized>(&self, writer: &mut W, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl HandExporter for JsonExporter {
    fn export_hands<W: Write>(
        &self,
        hands: &[Hand],
        writer: &mut W,
        _options: &ExportOptions,
    ) -> Result<()> {
        if self.use_envelope {
            self.export_report(hands, &[], writer)
        } else {
            self.write_json(writer, hands)
        }
    }
}

/// Envelope written around exported hands.
#[derive(Debug, Serialize)]
struct HandsExport<'a> {
    version: &'static str,
    hand_count: usize,
    hands: &'a [Hand],
    skipped_count: usize,
    skipped: &'a [SkippedHandInfo],
}
