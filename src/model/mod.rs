//! Data model for reconstructed poker hands.
//!
//! Every input format (PokerNow delimited log, the simplified JSON dialect,
//! Open Hand History JSON) is converted into the same [`Hand`] shape, so the
//! exporters never need to know where a hand came from.

pub mod entry;
pub mod filter;
pub mod hand;
pub mod skip;

pub use entry::*;
pub use filter::*;
pub use hand::*;
pub use skip::*;
