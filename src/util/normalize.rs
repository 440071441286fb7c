//! Normalization of identities, seats, hand identifiers and cards.
//!
//! PokerNow data is not directly usable by hand-history consumers: names
//! carry an opaque account suffix, seats have gaps, hand ids may be
//! alphanumeric and cards use suit glyphs. These helpers map all of that to
//! the conventional form.

use sha2::{Digest, Sha256};

use crate::model::Player;

/// Extract the display name from a PokerNow identity string.
///
/// Everything before the last `@` is kept, spaces and CSV-style doubled
/// quotes are removed, then one layer of surrounding `"` is trimmed.
/// Strings without `@` are returned unchanged.
///
/// ```
/// use pokernow2hh::util::display_name;
///
/// assert_eq!(display_name("whywaita @ DtjzvbAuKs"), "whywaita");
/// assert_eq!(display_name("spa @ ces @ ZQfm6ZDMPO"), "spa@ces");
/// ```
#[must_use]
pub fn display_name(full_name: &str) -> String {
    let Some(last_at) = full_name.rfind('@') else {
        return full_name.to_string();
    };

    let name = full_name[..last_at].replace(' ', "").replace("\"\"", "");
    name.trim_matches('"').to_string()
}

/// Renumber seats to 1..N in ascending order of the original seat.
///
/// The sort is stable, so players sharing a seat number keep input order.
#[must_use]
pub fn renumber_seats(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by_key(|p| p.seat);
    for (seat, player) in (1..).zip(players.iter_mut()) {
        player.seat = seat;
    }
    players
}

/// Coerce a hand identifier into a decimal integer string.
///
/// Identifiers that already parse as a signed 64-bit integer are returned
/// unchanged. Anything else is hashed with SHA-256 and the first 8 bytes of
/// the digest are read as a big-endian `u64`.
#[must_use]
pub fn coerce_hand_id(hand_id: &str) -> String {
    if hand_id.parse::<i64>().is_ok() {
        return hand_id.to_string();
    }

    let digest = Sha256::digest(hand_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix).to_string()
}

/// Normalize a single card token to rank + lowercase suit, e.g. `10♦` to `Td`.
#[must_use]
pub fn normalize_card(card: &str) -> String {
    card.trim()
        .replace('♥', "h")
        .replace('♦', "d")
        .replace('♣', "c")
        .replace('♠', "s")
        .replace("10", "T")
}

/// Parse a comma-separated card list such as `A♥, 4♦`.
#[must_use]
pub fn parse_cards(cards: &str) -> Vec<String> {
    cards
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(normalize_card)
        .collect()
}
