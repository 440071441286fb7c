//! Diagnostics for hands dropped from the output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a hand was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// The hand never reached its end marker: a new hand started first, or
    /// the input ended while it was still open.
    #[serde(rename = "incomplete_hand")]
    Incomplete,
    /// More seated players than the hard cap.
    #[serde(rename = "too_many_players")]
    TooManyPlayers,
    /// Rejected by the caller's player-count filter.
    #[serde(rename = "filtered_out")]
    FilteredOut,
    /// A JSON-Lines record could not be decoded.
    #[serde(rename = "invalid_record")]
    InvalidRecord,
}

impl SkipReason {
    /// Wire name of the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete_hand",
            Self::TooManyPlayers => "too_many_players",
            Self::FilteredOut => "filtered_out",
            Self::InvalidRecord => "invalid_record",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One skipped hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedHandInfo {
    /// Hand identifier, empty when unknown.
    pub hand_id: String,
    /// Hand number, empty when unknown.
    pub hand_number: String,
    /// Why the hand was dropped.
    pub reason: SkipReason,
    /// Human-readable explanation.
    pub detail: String,
    /// Observed player count, zero when not applicable.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub player_count: usize,
    /// Raw input lines belonging to the hand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_input: Vec<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}
