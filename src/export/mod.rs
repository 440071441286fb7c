//! Export of reconstructed hands.
//!
//! This module provides two output formats:
//! - Hand history: PokerStars-style tournament or cash-game text read by GTO
//!   Wizard and other hand-history tools
//! - JSON: the reconstructed [`Hand`] values and skip diagnostics, for
//!   inspection and scripting

mod json;
mod text;

pub use json::*;
pub use text::*;

use std::io::Write;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Hand;

/// Site label written when none is configured.
pub const DEFAULT_SITE_NAME: &str = "PokerStars";

/// Options shared by the exporters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Name written on the `Dealt to` line.
    pub hero_name: String,
    /// Site label at the start of every hand header.
    pub site_name: String,
    /// Time zone for hand timestamps.
    pub time_zone: Tz,
    /// Tournament id; the first hand's id when unset.
    pub tournament_id: Option<String>,
    /// Table name; `PokerNow <tournament id>` when unset.
    pub tournament_name: Option<String>,
    /// Rake as a percentage of the pot, 0 for none.
    pub rake_percent: f64,
    /// Rake cap in big blinds, 0 for uncapped.
    pub rake_cap_bb: f64,
    /// Tournament or cash-game layout.
    pub game_type: GameType,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            hero_name: String::new(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            time_zone: Tz::UTC,
            tournament_id: None,
            tournament_name: None,
            rake_percent: 0.0,
            rake_cap_bb: 0.0,
            game_type: GameType::default(),
        }
    }
}

impl ExportOptions {
    /// Options for the given hero.
    #[must_use]
    pub fn for_hero(hero_name: impl Into<String>) -> Self {
        Self {
            hero_name: hero_name.into(),
            ..Self::default()
        }
    }

    /// Builder: set the site label.
    #[must_use]
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    /// Builder: set the time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Builder: set the tournament id.
    #[must_use]
    pub fn with_tournament_id(mut self, id: impl Into<String>) -> Self {
        self.tournament_id = Some(id.into());
        self
    }

    /// Builder: set the table name.
    #[must_use]
    pub fn with_tournament_name(mut self, name: impl Into<String>) -> Self {
        self.tournament_name = Some(name.into());
        self
    }

    /// Builder: set the rake percentage and cap.
    #[must_use]
    pub fn with_rake(mut self, percent: f64, cap_bb: f64) -> Self {
        self.rake_percent = percent;
        self.rake_cap_bb = cap_bb;
        self
    }

    /// Builder: set the game type.
    #[must_use]
    pub fn with_game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }
}

/// Layout of the rendered hand history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Freeroll tournament header with a tournament id and plain chip amounts.
    #[default]
    Tournament,
    /// Ring-game header with the table name and `$` amounts.
    Cash,
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tournament => "tournament",
            Self::Cash => "cash",
        })
    }
}

/// Available export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// PokerStars-style hand history text.
    #[default]
    HandHistory,
    /// Compact JSON.
    Json,
    /// Pretty-printed JSON.
    JsonPretty,
}

/// Trait for hand exporters.
pub trait HandExporter {
    /// Write `hands` to `writer`.
    fn export_hands<W: Write>(
        &self,
        hands: &[Hand],
        writer: &mut W,
        options: &ExportOptions,
    ) -> Result<()>;
}

/// Render hands into a byte buffer in the given format.
pub fn render(hands: &[Hand], format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::HandHistory => {
            HandHistoryExporter::new().export_hands(hands, &mut buffer, options)?;
        }
        ExportFormat::Json => {
            JsonExporter::new().export_hands(hands, &mut buffer, options)?;
        }
        ExportFormat::JsonPretty => {
            JsonExporter::new()
                .pretty(true)
                .export_hands(hands, &mut buffer, options)?;
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExportOptions::for_hero("hero");
        assert_eq!(options.site_name, "PokerStars");
        assert_eq!(options.time_zone, Tz::UTC);
        assert!(options.tournament_id.is_none());
        assert_eq!(options.game_type, GameType::Tournament);
    }

    #[test]
    fn test_game_type_names() {
        assert_eq!(GameType::Cash.to_string(), "cash");
        assert_eq!(serde_json::to_string(&GameType::Tournament).unwrap(), "\"tournament\"");
        assert_eq!(serde_json::from_str::<GameType>("\"cash\"").unwrap(), GameType::Cash);
    }

    #[test]
    fn test_render_empty() {
        let out = render(&[], ExportFormat::HandHistory, &ExportOptions::default()).unwrap();
        assert!(out.is_empty());
    }
}
