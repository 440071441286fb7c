//! pokernow2hh: convert PokerNow logs into PokerStars-style hand histories.
//!
//! This crate reads the event logs downloaded from PokerNow (CSV), as well
//! as simplified and Open Hand History JSON documents and JSON Lines,
//! reconstructs structured poker hands from them, and renders those hands in
//! the PokerStars tournament dialect read by hand-history analysis tools.
//!
//! # Quick Start (High-Level API)
//!
//! For simple use cases, use the [`api`] module:
//!
//! ```rust,no_run
//! use pokernow2hh::api::{convert, ConvertOptions};
//! use pokernow2hh::model::PlayerCountFilter;
//!
//! fn main() -> pokernow2hh::Result<()> {
//!     let log = std::fs::read("poker_now_log.csv")?;
//!     let options = ConvertOptions::new("whywaita")
//!         .with_filter(PlayerCountFilter::HEADS_UP | PlayerCountFilter::MTT);
//!
//!     let result = convert(&log, &options)?;
//!     std::fs::write("hands.txt", &result.output)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`api`]: High-level conversion entry points
//! - [`model`]: Hands, players, actions, filters and skip diagnostics
//! - [`parser`]: Format detection and the CSV, JSON and JSON Lines readers
//! - [`reconstruction`]: The hand reconstruction state machine
//! - [`export`]: Hand history and JSON output
//! - [`util`]: Name, seat, id and card normalization; atomic writes
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//!
//! # Low-Level Example
//!
//! ```rust,no_run
//! use pokernow2hh::{model::PlayerCountFilter, parser::read_log, reconstruction::HandReconstructor};
//!
//! fn main() -> pokernow2hh::Result<()> {
//!     let file = std::fs::File::open("poker_now_log.csv")?;
//!     let entries = read_log(file)?;
//!     let result = HandReconstructor::new(PlayerCountFilter::ALL).reconstruct(&entries)?;
//!
//!     for hand in &result.hands {
//!         println!("hand #{}: {} players", hand.hand_number, hand.players.len());
//!     }
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/pokernow2hh/0.1.0")]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod reconstruction;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{ConvertError, Result};
pub use model::{Hand, SkippedHandInfo};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::{convert, parse_hands, ConvertOptions, ConvertResult};
    pub use crate::error::{ConvertError, Result};
    pub use crate::export::{ExportFormat, ExportOptions, GameType, HandExporter};
    pub use crate::model::{
        Action, ActionKind, Hand, Player, PlayerCountFilter, SkipReason, SkippedHandInfo, Street,
        Winner,
    };
}
