//! High-level conversion API.
//!
//! This module ties the pipeline together without needing to understand the
//! internal module structure: detect the input format, reconstruct hands,
//! apply the roster rules, and render.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pokernow2hh::api::{convert, ConvertOptions};
//!
//! fn main() -> pokernow2hh::Result<()> {
//!     let log = std::fs::read("poker_now_log.csv")?;
//!     let options = ConvertOptions::new("whywaita").with_site_name("PokerStars");
//!
//!     let result = convert(&log, &options)?;
//!     println!("{}", String::from_utf8_lossy(&result.output));
//!     eprintln!("{} hands were skipped.", result.skipped_hands);
//!     Ok(())
//! }
//! ```

use std::io::Cursor;

use chrono_tz::Tz;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::export::{render, ExportFormat, ExportOptions, GameType};
use crate::model::{Hand, PlayerCountFilter, SkippedHandInfo};
use crate::parser::{detect_format, read_json, read_log, InputFormat, JsonLinesReader};
use crate::reconstruction::{HandReconstructor, Reconstruction};

/// Options for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Hero display name written on the `Dealt to` line.
    pub hero_name: String,
    /// Site label, `PokerStars` when empty.
    pub site_name: String,
    /// Time zone of rendered timestamps, UTC when unset.
    pub time_zone: Option<Tz>,
    /// Table name override.
    pub tournament_name: Option<String>,
    /// Tournament id override.
    pub tournament_id: Option<String>,
    /// Accepted player-count classes.
    pub filter: PlayerCountFilter,
    /// Rake percentage, 0 for none.
    pub rake_percent: f64,
    /// Rake cap in big blinds, 0 for uncapped.
    pub rake_cap_bb: f64,
    /// Output format.
    pub format: ExportFormat,
    /// Tournament or cash-game hand history layout.
    pub game_type: GameType,
}

impl ConvertOptions {
    /// Options for the given hero with every other setting at its default.
    #[must_use]
    pub fn new(hero_name: impl Into<String>) -> Self {
        Self {
            hero_name: hero_name.into(),
            ..Self::default()
        }
    }

    /// Set the site label.
    #[must_use]
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    /// Set the output time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Set the table name.
    #[must_use]
    pub fn with_tournament_name(mut self, name: impl Into<String>) -> Self {
        self.tournament_name = Some(name.into());
        self
    }

    /// Set the tournament id.
    #[must_use]
    pub fn with_tournament_id(mut self, id: impl Into<String>) -> Self {
        self.tournament_id = Some(id.into());
        self
    }

    /// Set the player-count filter.
    #[must_use]
    pub fn with_filter(mut self, filter: PlayerCountFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the rake percentage and cap.
    #[must_use]
    pub fn with_rake(mut self, percent: f64, cap_bb: f64) -> Self {
        self.rake_percent = percent;
        self.rake_cap_bb = cap_bb;
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the hand history layout.
    #[must_use]
    pub fn with_game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }

    /// Renderer options derived from these settings.
    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        let mut options = ExportOptions::for_hero(self.hero_name.clone())
            .with_rake(self.rake_percent, self.rake_cap_bb)
            .with_game_type(self.game_type);
        if !self.site_name.is_empty() {
            options = options.with_site_name(self.site_name.clone());
        }
        if let Some(tz) = self.time_zone {
            options = options.with_time_zone(tz);
        }
        if let Some(name) = self.tournament_name.as_deref().filter(|n| !n.is_empty()) {
            options = options.with_tournament_name(name);
        }
        if let Some(id) = self.tournament_id.as_deref().filter(|id| !id.is_empty()) {
            options = options.with_tournament_id(id);
        }
        options
    }
}

/// Output of [`convert`].
#[derive(Debug, Clone, Default)]
pub struct ConvertResult {
    /// Rendered output.
    pub output: Vec<u8>,
    /// Number of dropped hands and records.
    pub skipped_hands: usize,
    /// One diagnostic per dropped hand or record.
    pub skipped_hands_info: Vec<SkippedHandInfo>,
    /// The hands that were rendered.
    pub hands: Vec<Hand>,
}

/// Detect the input format and reconstruct its hands.
///
/// Fails with [`crate::ConvertError::SpectatorLog`] when hands exist but none
/// carries hero cards.
#[instrument(skip(data), fields(bytes = data.len()), level = "debug")]
pub fn parse_hands(data: &[u8], filter: PlayerCountFilter) -> Result<Reconstruction> {
    let reconstructor = HandReconstructor::new(filter);

    let reconstruction = match detect_format(data) {
        InputFormat::DelimitedLog => {
            let entries = read_log(data)?;
            return reconstructor.reconstruct(&entries);
        }
        InputFormat::SingleJson => reconstructor.admit(read_json(data)?),
        InputFormat::JsonLines => {
            let lines = JsonLinesReader::new().read(Cursor::new(data))?;
            let mut reconstruction = Reconstruction {
                hands: Vec::new(),
                skipped: lines.skipped,
            };
            reconstruction.extend(reconstructor.admit(lines.hands));
            reconstruction
        }
    };

    reconstruction.ensure_hero_perspective()?;
    Ok(reconstruction)
}

/// Convert a PokerNow log or hand-history JSON into the requested output.
#[instrument(skip_all, fields(bytes = data.len()), level = "debug")]
pub fn convert(data: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    let Reconstruction { hands, skipped } = parse_hands(data, options.filter)?;
    let output = render(&hands, options.format, &options.export_options())?;

    debug!(
        hands = hands.len(),
        skipped = skipped.len(),
        bytes = output.len(),
        "Conversion complete"
    );
    Ok(ConvertResult {
        output,
        skipped_hands: skipped.len(),
        skipped_hands_info: skipped,
        hands,
    })
}
