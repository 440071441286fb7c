//! Adapters for the two JSON hand-history dialects.
//!
//! The simplified dialect is a flat `{"version", "hands": [...]}` document
//! using camelCase keys. The Open Hand History dialect wraps a single hand
//! in `{"id", "ohh": {...}}` with players, rounds and pots referenced by
//! numeric player id. Both decode into [`Hand`] with seats renumbered and
//! the hand id coerced to a number.
//!
//! Action and street names outside the known vocabulary are rejected rather
//! than defaulted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{ConvertError, Result};
use crate::model::{Action, ActionKind, Board, Hand, Player, Street, Winner};
use crate::util::{coerce_hand_id, normalize_card, renumber_seats};

/// Simplified dialect document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleDocument {
    /// Format version string.
    #[serde(default)]
    pub version: String,
    /// Hands in the document.
    #[serde(default)]
    pub hands: Vec<SimpleHand>,
}

/// One hand of the simplified dialect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimpleHand {
    pub hand_id: String,
    #[serde(default)]
    pub hand_number: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub blinds: SimpleBlinds,
    #[serde(default)]
    pub ante: u64,
    #[serde(default)]
    pub players: Vec<SimplePlayer>,
    #[serde(default)]
    pub dealer: SimpleSeatRef,
    #[serde(default)]
    pub hero_cards: Vec<String>,
    #[serde(default)]
    pub board: SimpleBoard,
    #[serde(default)]
    pub actions: Vec<SimpleAction>,
    #[serde(default)]
    pub winners: Vec<SimpleWinner>,
}

/// Blind amounts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimpleBlinds {
    pub small_blind: u64,
    pub big_blind: u64,
}

/// A seated player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimplePlayer {
    pub seat_number: u32,
    pub name: String,
    pub stack: u64,
}

/// Reference to a seat.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimpleSeatRef {
    pub seat_number: u32,
}

/// Community cards.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct SimpleBoard {
    #[serde(default)]
    pub flop: Vec<String>,
    #[serde(default)]
    pub turn: Option<String>,
    #[serde(default)]
    pub river: Option<String>,
}

/// One action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimpleAction {
    pub player: String,
    pub action_type: String,
    #[serde(default)]
    pub amount: u64,
    pub street: String,
    #[serde(default)]
    pub is_all_in: bool,
}

/// A pot winner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SimpleWinner {
    pub player: String,
    pub amount: u64,
    #[serde(default)]
    pub hand_cards: Vec<String>,
}

/// Open Hand History envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OhhEnvelope {
    /// Optional envelope identifier.
    #[serde(default)]
    pub id: Option<Value>,
    /// The hand.
    pub ohh: OhhHand,
}

/// Open Hand History hand (subset used for conversion).
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhHand {
    #[serde(default)]
    pub spec_version: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub game_number: String,
    #[serde(default)]
    pub start_date_utc: DateTime<Utc>,
    #[serde(default)]
    pub small_blind_amount: f64,
    #[serde(default)]
    pub big_blind_amount: f64,
    #[serde(default)]
    pub ante_amount: f64,
    #[serde(default)]
    pub dealer_seat: u32,
    #[serde(default)]
    pub hero_player_id: u64,
    #[serde(default)]
    pub players: Vec<OhhPlayer>,
    #[serde(default)]
    pub rounds: Vec<OhhRound>,
    #[serde(default)]
    pub pots: Vec<OhhPot>,
}

/// Open Hand History player.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhPlayer {
    pub id: u64,
    pub seat: u32,
    pub name: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub starting_stack: f64,
    #[serde(default)]
    pub cards: Vec<String>,
}

/// Open Hand History betting round.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhRound {
    #[serde(default)]
    pub id: u64,
    pub street: String,
    #[serde(default)]
    pub cards: Vec<String>,
    #[serde(default)]
    pub actions: Vec<OhhAction>,
}

/// Open Hand History action.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhAction {
    #[serde(default)]
    pub action_number: u64,
    pub player_id: u64,
    pub action: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub is_allin: bool,
}

/// Open Hand History pot.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhPot {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub player_wins: Vec<OhhPlayerWin>,
}

/// One player's share of a pot.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct OhhPlayerWin {
    pub player_id: u64,
    pub win_amount: f64,
}

/// Decode one JSON object in either dialect.
///
/// Objects carrying an `ohh` key are Open Hand History; everything else is
/// read as the simplified dialect. `line` is used in error messages.
#[instrument(skip(value), level = "debug")]
pub fn read_json_value(value: Value, line: usize) -> Result<Vec<Hand>> {
    if value.get("ohh").is_some() {
        let envelope: OhhEnvelope = serde_json::from_value(value)
            .map_err(|e| ConvertError::json("Open Hand History document", e))?;
        let hand = envelope.into_hand(line)?;
        debug!(hand_number = %hand.hand_number, "Decoded Open Hand History hand");
        return Ok(vec![hand]);
    }

    let document: SimpleDocument = serde_json::from_value(value)
        .map_err(|e| ConvertError::json("simplified hand-history document", e))?;
    debug!(version = %document.version, hands = document.hands.len(), "Decoded simplified document");
    document
        .hands
        .into_iter()
        .map(|hand| hand.into_hand(line))
        .collect()
}

/// Decode a buffer holding one JSON object in either dialect.
pub fn read_json(data: &[u8]) -> Result<Vec<Hand>> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| ConvertError::json("hand-history JSON", e))?;
    if !value.is_object() {
        return Err(ConvertError::format("hand-history JSON must be an object"));
    }
    read_json_value(value, 1)
}

/// Match a simplified-dialect action name.
fn simple_action_kind(name: &str, line: usize) -> Result<ActionKind> {
    let kind = match name.to_ascii_lowercase().as_str() {
        "fold" => ActionKind::Fold,
        "check" => ActionKind::Check,
        "call" => ActionKind::Call,
        "bet" => ActionKind::Bet,
        "raise" => ActionKind::Raise,
        "postsb" => ActionKind::PostSmallBlind,
        "postbb" => ActionKind::PostBigBlind,
        "postante" => ActionKind::PostAnte,
        "show" => ActionKind::Show,
        "collect" => ActionKind::Collect,
        "uncalled" => ActionKind::UncalledReturn,
        _ => {
            return Err(ConvertError::parse(
                line,
                "actionType",
                format!("unknown action type {name:?}"),
            ))
        }
    };
    Ok(kind)
}

/// Outcome of matching an Open Hand History action name.
enum OhhActionName {
    Kind(ActionKind),
    /// Known action with no counterpart in the hand model.
    Ignored,
}

fn ohh_action_kind(name: &str, line: usize) -> Result<OhhActionName> {
    let kind = match name.to_ascii_lowercase().as_str() {
        "fold" => ActionKind::Fold,
        "check" => ActionKind::Check,
        "call" => ActionKind::Call,
        "bet" => ActionKind::Bet,
        "raise" => ActionKind::Raise,
        "post sb" | "postsb" => ActionKind::PostSmallBlind,
        "post bb" | "postbb" => ActionKind::PostBigBlind,
        "post ante" | "postante" => ActionKind::PostAnte,
        "show" | "shows cards" => ActionKind::Show,
        "collect" => ActionKind::Collect,
        "uncalled" => ActionKind::UncalledReturn,
        "dealt cards" | "mucks cards" => return Ok(OhhActionName::Ignored),
        _ => {
            return Err(ConvertError::parse(
                line,
                "action",
                format!("unknown action {name:?}"),
            ))
        }
    };
    Ok(OhhActionName::Kind(kind))
}

fn street(name: &str, field: &str, line: usize) -> Result<Street> {
    Street::from_name(name)
        .ok_or_else(|| ConvertError::parse(line, field, format!("unknown street {name:?}")))
}

/// Convert a JSON chip amount to whole chips.
fn chips(amount: f64, field: &str, line: usize) -> Result<u64> {
    if !amount.is_finite() || amount < 0.0 || amount.fract() != 0.0 || amount > u64::MAX as f64 {
        return Err(ConvertError::parse(
            line,
            field,
            format!("{amount} is not a whole, non-negative chip amount"),
        ));
    }
    Ok(amount as u64)
}

fn normalize_all(cards: &[String]) -> Vec<String> {
    cards.iter().map(|c| normalize_card(c)).collect()
}

/// Dealer display name, resolved from the original seat numbers.
fn dealer_name(players: &[Player], dealer_seat: u32) -> String {
    players
        .iter()
        .find(|p| p.seat == dealer_seat)
        .map(|p| p.display_name.clone())
        .unwrap_or_default()
}

impl SimpleHand {
    /// Convert into a [`Hand`].
    pub fn into_hand(self, line: usize) -> Result<Hand> {
        let players: Vec<Player> = self
            .players
            .into_iter()
            .map(|p| Player {
                seat: p.seat_number,
                display_name: p.name.clone(),
                name: p.name,
                stack: p.stack,
            })
            .collect();
        let dealer = dealer_name(&players, self.dealer.seat_number);

        let actions = self
            .actions
            .into_iter()
            .map(|a| {
                let kind = simple_action_kind(&a.action_type, line)?;
                let street = street(&a.street, "street", line)?;
                Ok(Action::new(a.player, kind, a.amount, street).with_all_in(a.is_all_in))
            })
            .collect::<Result<Vec<_>>>()?;

        let hand_number = if self.hand_number.is_empty() {
            self.hand_id.clone()
        } else {
            self.hand_number
        };

        let mut hand = Hand::new(hand_number, coerce_hand_id(&self.hand_id), dealer, self.start_time);
        hand.players = renumber_seats(players);
        hand.actions = actions;
        hand.board = Board {
            flop: normalize_all(&self.board.flop),
            turn: self.board.turn.as_deref().map(normalize_card),
            river: self.board.river.as_deref().map(normalize_card),
        };
        hand.small_blind = self.blinds.small_blind;
        hand.big_blind = self.blinds.big_blind;
        hand.ante = self.ante;
        hand.winners = self
            .winners
            .into_iter()
            .map(|w| Winner {
                player: w.player,
                amount: w.amount,
                hand_cards: normalize_all(&w.hand_cards),
            })
            .collect();
        hand.hero_cards = normalize_all(&self.hero_cards);
        hand.table_name = self.table_name;
        Ok(hand)
    }
}

impl OhhEnvelope {
    /// Convert into a [`Hand`].
    ///
    /// The hand id is `game_number`, else the envelope `id`, else `"1"`.
    pub fn into_hand(self, line: usize) -> Result<Hand> {
        let raw_id = if !self.ohh.game_number.is_empty() {
            self.ohh.game_number.clone()
        } else {
            match &self.id {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => "1".to_string(),
            }
        };
        self.ohh.into_hand(raw_id, line)
    }
}

impl OhhHand {
    fn into_hand(self, raw_id: String, line: usize) -> Result<Hand> {
        let by_id: HashMap<u64, &OhhPlayer> = self.players.iter().map(|p| (p.id, p)).collect();
        let player_name = |id: u64| -> Result<String> {
            by_id.get(&id).map(|p| p.name.clone()).ok_or_else(|| {
                ConvertError::parse(line, "player_id", format!("unknown player id {id}"))
            })
        };

        let players = self
            .players
            .iter()
            .map(|p| {
                Ok(Player {
                    seat: p.seat,
                    name: p.name.clone(),
                    display_name: p.name.clone(),
                    stack: chips(p.starting_stack, "starting_stack", line)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let dealer = dealer_name(&players, self.dealer_seat);

        let mut board = Board::default();
        let mut actions = Vec::new();
        for round in &self.rounds {
            let round_street = street(&round.street, "street", line)?;
            match round_street {
                Street::Flop if round.cards.len() >= 3 => board.flop = normalize_all(&round.cards[..3]),
                Street::Turn => board.turn = round.cards.first().map(|c| normalize_card(c)),
                Street::River => board.river = round.cards.first().map(|c| normalize_card(c)),
                _ => {}
            }

            for action in &round.actions {
                let OhhActionName::Kind(kind) = ohh_action_kind(&action.action, line)? else {
                    continue;
                };
                actions.push(
                    Action::new(
                        player_name(action.player_id)?,
                        kind,
                        chips(action.amount, "amount", line)?,
                        round_street,
                    )
                    .with_all_in(action.is_allin),
                );
            }
        }

        let mut winners = Vec::new();
        for pot in &self.pots {
            for win in &pot.player_wins {
                let cards = by_id
                    .get(&win.player_id)
                    .map(|p| normalize_all(&p.cards))
                    .unwrap_or_default();
                winners.push(Winner {
                    player: player_name(win.player_id)?,
                    amount: chips(win.win_amount, "win_amount", line)?,
                    hand_cards: cards,
                });
            }
        }

        let hero_cards = by_id
            .get(&self.hero_player_id)
            .map(|p| normalize_all(&p.cards))
            .unwrap_or_default();

        let mut hand = Hand::new(raw_id.clone(), coerce_hand_id(&raw_id), dealer, self.start_date_utc);
        hand.players = renumber_seats(players);
        hand.actions = actions;
        hand.board = board;
        hand.small_blind = chips(self.small_blind_amount, "small_blind_amount", line)?;
        hand.big_blind = chips(self.big_blind_amount, "big_blind_amount", line)?;
        hand.ante = chips(self.ante_amount, "ante_amount", line)?;
        hand.winners = winners;
        hand.hero_cards = hero_cards;
        hand.site_name = self.site_name;
        hand.table_name = self.table_name;
        hand.currency = self.currency;
        Ok(hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn simple_doc() -> Value {
        json!({
            "version": "1.0",
            "hands": [{
                "handId": "abc123",
                "handNumber": "5",
                "gameType": "No Limit Texas Hold'em",
                "tableName": "Test",
                "startTime": "2024-05-01T10:00:00Z",
                "blinds": {"smallBlind": 10, "bigBlind": 20},
                "players": [
                    {"seatNumber": 9, "name": "bob", "stack": 1000},
                    {"seatNumber": 3, "name": "alice", "stack": 2000}
                ],
                "dealer": {"seatNumber": 9},
                "heroCards": ["A♥", "Kd"],
                "board": {"flop": ["2c", "3d", "10♠"], "turn": "5h"},
                "actions": [
                    {"player": "alice", "actionType": "postSB", "amount": 10, "street": "preflop"},
                    {"player": "bob", "actionType": "postBB", "amount": 20, "street": "preflop"},
                    {"player": "alice", "actionType": "raise", "amount": 2000, "street": "Preflop", "isAllIn": true},
                    {"player": "bob", "actionType": "fold", "street": "preflop"}
                ],
                "winners": [{"player": "alice", "amount": 40}]
            }]
        })
    }

    fn ohh_doc() -> Value {
        json!({
            "id": "envelope-1",
            "ohh": {
                "spec_version": "1.4.7",
                "site_name": "PokerNow",
                "table_name": "Friday",
                "currency": "Chips",
                "game_number": "777",
                "start_date_utc": "2024-05-01T10:00:00Z",
                "small_blind_amount": 5,
                "big_blind_amount": 10,
                "ante_amount": 0,
                "dealer_seat": 6,
                "hero_player_id": 2,
                "players": [
                    {"id": 1, "seat": 6, "name": "villain", "starting_stack": 500},
                    {"id": 2, "seat": 2, "name": "hero", "starting_stack": 800.0, "cards": ["Ah", "Ad"]}
                ],
                "rounds": [
                    {"id": 0, "street": "Preflop", "cards": [], "actions": [
                        {"action_number": 1, "player_id": 2, "action": "Dealt Cards"},
                        {"action_number": 2, "player_id": 1, "action": "Post SB", "amount": 5},
                        {"action_number": 3, "player_id": 2, "action": "Post BB", "amount": 10},
                        {"action_number": 4, "player_id": 1, "action": "Call", "amount": 5}
                    ]},
                    {"id": 1, "street": "Flop", "cards": ["Kh", "7c", "2d"], "actions": [
                        {"action_number": 5, "player_id": 2, "action": "Bet", "amount": 20},
                        {"action_number": 6, "player_id": 1, "action": "Fold"}
                    ]}
                ],
                "pots": [{"number": 0, "amount": 20, "player_wins": [{"player_id": 2, "win_amount": 20}]}]
            }
        })
    }

    #[test]
    fn test_simple_dialect() {
        let hands = read_json_value(simple_doc(), 1).unwrap();
        assert_eq!(hands.len(), 1);
        let hand = &hands[0];

        assert_eq!(hand.hand_number, "5");
        assert_eq!(hand.hand_id, coerce_hand_id("abc123"));
        assert_eq!(hand.dealer, "bob");
        assert_eq!(hand.dealer_seat(), Some(2));
        assert_eq!(hand.players[0].display_name, "alice");
        assert_eq!(hand.players[0].seat, 1);
        assert_eq!(hand.hero_cards, vec!["Ah", "Kd"]);
        assert_eq!(hand.board.flop, vec!["2c", "3d", "Ts"]);
        assert_eq!(hand.board.turn.as_deref(), Some("5h"));
        assert_eq!(hand.actions[0].kind, ActionKind::PostSmallBlind);
        assert!(hand.actions[2].all_in);
        assert_eq!(hand.actions[3].amount, 0);
        assert_eq!(hand.winners[0].amount, 40);
        assert_eq!(hand.table_name, "Test");
        assert!(hand.site_name.is_empty());
    }

    #[test]
    fn test_simple_dialect_rejects_unknown_action() {
        let mut doc = simple_doc();
        doc["hands"][0]["actions"][3]["actionType"] = json!("straddle");
        let err = read_json_value(doc, 4).unwrap_err();
        assert!(
            matches!(err, ConvertError::Parse { line: 4, ref field, .. } if field == "actionType"),
            "{err}"
        );
    }

    #[test]
    fn test_simple_dialect_rejects_unknown_street() {
        let mut doc = simple_doc();
        doc["hands"][0]["actions"][0]["street"] = json!("fifth");
        assert!(read_json_value(doc, 1).is_err());
    }

    #[test]
    fn test_ohh_dialect() {
        let hands = read_json_value(ohh_doc(), 1).unwrap();
        let hand = &hands[0];

        assert_eq!(hand.hand_number, "777");
        assert_eq!(hand.hand_id, "777");
        assert_eq!(hand.dealer, "villain");
        assert_eq!(hand.dealer_seat(), Some(2));
        assert_eq!(hand.players[0].name, "hero");
        assert_eq!(hand.players[0].stack, 800);
        assert_eq!(hand.hero_cards, vec!["Ah", "Ad"]);
        assert_eq!(hand.board.flop, vec!["Kh", "7c", "2d"]);
        assert_eq!(hand.small_blind, 5);
        assert_eq!(hand.big_blind, 10);

        let kinds: Vec<(ActionKind, Street)> = hand.actions.iter().map(|a| (a.kind, a.street)).collect();
        assert_eq!(
            kinds,
            vec![
                (ActionKind::PostSmallBlind, Street::Preflop),
                (ActionKind::PostBigBlind, Street::Preflop),
                (ActionKind::Call, Street::Preflop),
                (ActionKind::Bet, Street::Flop),
                (ActionKind::Fold, Street::Flop),
            ]
        );
        assert_eq!(hand.winners[0].player, "hero");
        assert_eq!(hand.winners[0].hand_cards, vec!["Ah", "Ad"]);
        assert_eq!(hand.table_label(), "PokerNow - Friday");
        assert!(hand.is_play_chips());
    }

    #[test]
    fn test_ohh_id_fallbacks() {
        let mut doc = ohh_doc();
        doc["ohh"]["game_number"] = json!("");
        let hand = read_json_value(doc.clone(), 1).unwrap().remove(0);
        assert_eq!(hand.hand_number, "envelope-1");
        assert_eq!(hand.hand_id, coerce_hand_id("envelope-1"));

        doc.as_object_mut().unwrap().remove("id");
        let hand = read_json_value(doc, 1).unwrap().remove(0);
        assert_eq!(hand.hand_id, "1");
    }

    #[test]
    fn test_ohh_rejects_unknown_action() {
        let mut doc = ohh_doc();
        doc["ohh"]["rounds"][1]["actions"][0]["action"] = json!("Teleport");
        let err = read_json_value(doc, 1).unwrap_err();
        assert!(err.to_string().contains("Teleport"), "{err}");
    }

    #[test]
    fn test_ohh_rejects_fractional_amount() {
        let mut doc = ohh_doc();
        doc["ohh"]["big_blind_amount"] = json!(0.5);
        assert!(read_json_value(doc, 1).is_err());
    }

    #[test]
    fn test_ohh_rejects_unknown_player_reference() {
        let mut doc = ohh_doc();
        doc["ohh"]["rounds"][0]["actions"][1]["player_id"] = json!(99);
        assert!(read_json_value(doc, 1).is_err());
    }

    #[test]
    fn test_read_json_rejects_non_object() {
        assert!(read_json(b"[1, 2]").is_err());
        assert!(read_json(b"{not json").is_err());
    }
}
