//! Hand, player, action and winner types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A betting round, or the terminal showdown phase.
///
/// Variants are ordered, so `Street::Flop < Street::Turn` holds and a hand's
/// current street can be advanced with `max`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Before the flop.
    #[default]
    Preflop,
    /// After the first three board cards.
    Flop,
    /// After the fourth board card.
    Turn,
    /// After the fifth board card.
    River,
    /// Hands shown and pots collected.
    Showdown,
}

impl Street {
    /// All streets in dealing order.
    pub const ALL: [Self; 5] = [
        Self::Preflop,
        Self::Flop,
        Self::Turn,
        Self::River,
        Self::Showdown,
    ];

    /// Lowercase name used by both JSON dialects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        }
    }

    /// Match a street name case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|street| street.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Player folds.
    Fold,
    /// Player checks.
    Check,
    /// Player calls; amount is the street total the player called to.
    Call,
    /// Player opens the betting on a street.
    Bet,
    /// Player raises; amount is the "raise to" total.
    Raise,
    /// Forced small blind.
    PostSmallBlind,
    /// Forced big blind.
    PostBigBlind,
    /// Forced ante.
    PostAnte,
    /// Player reveals hole cards.
    Show,
    /// Player collects from a pot.
    Collect,
    /// Unmatched part of a bet returned to its owner.
    UncalledReturn,
}

impl ActionKind {
    /// Voluntary chip-committing actions.
    #[must_use]
    pub const fn is_voluntary_bet(self) -> bool {
        matches!(self, Self::Call | Self::Bet | Self::Raise)
    }

    /// Forced bets posted before cards are dealt.
    #[must_use]
    pub const fn is_forced(self) -> bool {
        matches!(
            self,
            Self::PostSmallBlind | Self::PostBigBlind | Self::PostAnte
        )
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat number, contiguous 1..N after renumbering.
    pub seat: u32,
    /// Raw identity string as logged, e.g. `whywaita @ DtjzvbAuKs`.
    pub name: String,
    /// Name shown in rendered output.
    pub display_name: String,
    /// Chips at the start of the hand.
    pub stack: u64,
}

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Display name of the acting player.
    pub player: String,
    /// What the player did.
    pub kind: ActionKind,
    /// Chip amount, zero for fold, check and show.
    pub amount: u64,
    /// Street the action happened on.
    pub street: Street,
    /// Whether the action put the player all in.
    #[serde(default)]
    pub all_in: bool,
}

impl Action {
    /// Create a new non-all-in action.
    pub fn new(player: impl Into<String>, kind: ActionKind, amount: u64, street: Street) -> Self {
        Self {
            player: player.into(),
            kind,
            amount,
            street,
            all_in: false,
        }
    }

    /// Set the all-in flag.
    #[must_use]
    pub fn with_all_in(mut self, all_in: bool) -> Self {
        self.all_in = all_in;
        self
    }
}

/// Community cards. Each street is only populated after the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// First three cards.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flop: Vec<String>,
    /// Fourth card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<String>,
    /// Fifth card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub river: Option<String>,
}

impl Board {
    /// All dealt board cards in order.
    #[must_use]
    pub fn cards(&self) -> Vec<&str> {
        self.flop
            .iter()
            .map(String::as_str)
            .chain(self.turn.as_deref())
            .chain(self.river.as_deref())
            .collect()
    }

    /// Whether no board card has been dealt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flop.is_empty() && self.turn.is_none() && self.river.is_none()
    }
}

/// A pot winner, or a player who reached showdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Display name.
    pub player: String,
    /// Chips won, zero for a player who showed and lost.
    pub amount: u64,
    /// Revealed hole cards, empty when the hand was not shown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hand_cards: Vec<String>,
}

/// A fully reconstructed hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    /// Site-assigned hand number.
    pub hand_number: String,
    /// Numeric hand identifier.
    pub hand_id: String,
    /// Dealer display name, empty for a dead button.
    pub dealer: String,
    /// Seated players, ordered by seat.
    pub players: Vec<Player>,
    /// Actions in the order they happened.
    pub actions: Vec<Action>,
    /// Community cards.
    pub board: Board,
    /// Time the hand started.
    pub start_time: DateTime<Utc>,
    /// Small blind amount.
    pub small_blind: u64,
    /// Big blind amount.
    pub big_blind: u64,
    /// Ante amount.
    pub ante: u64,
    /// Winners and showdown participants.
    pub winners: Vec<Winner>,
    /// Hero hole cards, empty when hero was not dealt in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hero_cards: Vec<String>,
    /// Site the hand was played on, when the input names one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub site_name: String,
    /// Table the hand was played at, when the input names one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub table_name: String,
    /// Currency of the amounts, when the input names one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
}

impl Hand {
    /// Create an empty hand.
    pub fn new(
        hand_number: impl Into<String>,
        hand_id: impl Into<String>,
        dealer: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            hand_number: hand_number.into(),
            hand_id: hand_id.into(),
            dealer: dealer.into(),
            players: Vec::new(),
            actions: Vec::new(),
            board: Board::default(),
            start_time,
            small_blind: 0,
            big_blind: 0,
            ante: 0,
            winners: Vec::new(),
            hero_cards: Vec::new(),
            site_name: String::new(),
            table_name: String::new(),
            currency: String::new(),
        }
    }

    /// Whether hero hole cards were recorded.
    #[must_use]
    pub fn has_hero_cards(&self) -> bool {
        !self.hero_cards.is_empty()
    }

    /// Seat of the dealer, if the dealer is seated.
    #[must_use]
    pub fn dealer_seat(&self) -> Option<u32> {
        if self.dealer.is_empty() {
            return None;
        }
        self.players
            .iter()
            .find(|p| p.display_name == self.dealer)
            .map(|p| p.seat)
    }

    /// Actions recorded on one street.
    pub fn actions_on(&self, street: Street) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(move |a| a.street == street)
    }

    /// Whether anybody showed cards.
    #[must_use]
    pub fn has_showdown(&self) -> bool {
        self.actions.iter().any(|a| a.kind == ActionKind::Show)
    }

    /// Display name of the last player to post the given forced bet.
    #[must_use]
    pub fn poster_of(&self, kind: ActionKind) -> Option<&str> {
        self.actions
            .iter()
            .rev()
            .find(|a| a.kind == kind)
            .map(|a| a.player.as_str())
    }

    /// Sum of all winnings. Uncalled returns are never part of the pot.
    #[must_use]
    pub fn total_pot(&self) -> u64 {
        self.winners
            .iter()
            .fold(0u64, |total, w| total.saturating_add(w.amount))
    }

    /// Whether amounts are play chips rather than money.
    #[must_use]
    pub fn is_play_chips(&self) -> bool {
        self.currency.eq_ignore_ascii_case("chips")
    }

    /// Table label for cash-game output: site and table joined when both
    /// are known, otherwise the table, otherwise `Poker Now`.
    #[must_use]
    pub fn table_label(&self) -> String {
        match (self.site_name.is_empty(), self.table_name.is_empty()) {
            (false, false) => format!("{} - {}", self.site_name, self.table_name),
            (_, false) => self.table_name.clone(),
            _ => "Poker Now".to_string(),
        }
    }

    /// Record a showdown reveal.
    pub fn record_show(&mut self, player: &str, cards: Vec<String>) {
        self.winners.push(Winner {
            player: player.to_string(),
            amount: 0,
            hand_cards: cards,
        });
    }

    /// Record a pot collection.
    ///
    /// The first winner entry with the same name gets the amount; otherwise a
    /// new winner without cards is appended.
    pub fn record_collect(&mut self, player: &str, amount: u64) {
        match self.winners.iter_mut().find(|w| w.player == player) {
            Some(winner) => winner.amount = amount,
            None => self.winners.push(Winner {
                player: player.to_string(),
                amount,
                hand_cards: Vec::new(),
            }),
        }
    }
}
