//! Player-count filtering.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Hands with more seated players than this are always dropped.
pub const MAX_PLAYERS: usize = 10;

/// Bitset of acceptable player-count classes.
///
/// The empty set accepts every hand that passes the [`MAX_PLAYERS`] cap.
/// Classes combine with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerCountFilter(u8);

impl PlayerCountFilter {
    /// Accept every player count.
    pub const ALL: Self = Self(0);
    /// Heads-up hands, exactly 2 players.
    pub const HEADS_UP: Self = Self(1 << 0);
    /// Spin & Go style hands, exactly 3 players.
    pub const SPIN_AND_GO: Self = Self(1 << 1);
    /// Multi-table tournament hands, 4 to 9 players.
    pub const MTT: Self = Self(1 << 2);

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether no class is selected.
    #[must_use]
    pub const fn is_all(self) -> bool {
        self.0 == 0
    }

    /// Whether every class in `other` is selected.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether a hand with `player_count` seated players is accepted.
    #[must_use]
    pub const fn allows(self, player_count: usize) -> bool {
        if self.is_all() {
            return true;
        }
        (self.0 & Self::HEADS_UP.0 != 0 && player_count == 2)
            || (self.0 & Self::SPIN_AND_GO.0 != 0 && player_count == 3)
            || (self.0 & Self::MTT.0 != 0 && player_count >= 4 && player_count <= 9)
    }
}

impl BitOr for PlayerCountFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PlayerCountFilter {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for PlayerCountFilter {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::ALL),
            "hu" | "heads-up" | "headsup" => Ok(Self::HEADS_UP),
            "spin" | "spinandgo" | "spin-and-go" | "sng" => Ok(Self::SPIN_AND_GO),
            "mtt" => Ok(Self::MTT),
            other => Err(ConvertError::invalid_argument(
                "filter",
                format!("unknown player-count class '{other}' (expected all, hu, spin-and-go or mtt)"),
            )),
        }
    }
}

impl fmt::Display for PlayerCountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("all");
        }
        let names: Vec<&str> = [
            (Self::HEADS_UP, "hu"),
            (Self::SPIN_AND_GO, "spin-and-go"),
            (Self::MTT, "mtt"),
        ]
        .into_iter()
        .filter(|(class, _)| self.contains(*class))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_all_accepts_two_to_ten() {
        for count in 2..=MAX_PLAYERS {
            assert!(PlayerCountFilter::ALL.allows(count), "count {count}");
        }
    }

    #[rstest]
    #[case(2, true)]
    #[case(3, false)]
    #[case(4, false)]
    #[case(10, false)]
    fn test_heads_up_only(#[case] count: usize, #[case] allowed: bool) {
        assert_eq!(PlayerCountFilter::HEADS_UP.allows(count), allowed);
    }

    #[test]
    fn test_combined_classes() {
        let filter = PlayerCountFilter::HEADS_UP | PlayerCountFilter::SPIN_AND_GO;
        assert!(filter.allows(2));
        assert!(filter.allows(3));
        for count in 4..=10 {
            assert!(!filter.allows(count), "count {count}");
        }
    }

    #[test]
    fn test_mtt_range() {
        let filter = PlayerCountFilter::MTT;
        assert!(!filter.allows(3));
        assert!(filter.allows(4));
        assert!(filter.allows(9));
        assert!(!filter.allows(10));
    }

    #[test]
    fn test_parse_and_display() {
        let mut filter: PlayerCountFilter = "hu".parse().unwrap();
        filter |= "MTT".parse().unwrap();
        assert_eq!(filter.to_string(), "hu|mtt");
        assert_eq!(PlayerCountFilter::ALL.to_string(), "all");
        assert!("six-max".parse::<PlayerCountFilter>().is_err());
    }
}
