//! Hand reconstruction from PokerNow log entries.
//!
//! This module handles:
//! - Splitting the entry stream into hands on start/end markers
//! - Accumulating players, blinds, board, actions and winners per hand
//! - Dropping hands that exceed the seat cap or fail the player-count filter
//! - Reporting hands that never reached their end marker
//! - Rejecting logs captured by a spectator
//!
//! The same roster rules are applied to hands decoded from JSON through
//! [`HandReconstructor::admit`].

mod recognizers;

pub use recognizers::*;

use tracing::{debug, instrument, warn};

use crate::error::{ConvertError, Result};
use crate::model::{
    Action, ActionKind, Hand, LogEntry, PlayerCountFilter, SkipReason, SkippedHandInfo, Street,
    MAX_PLAYERS,
};
use crate::util::{coerce_hand_id, display_name};

/// Hands produced by one conversion plus diagnostics for the dropped ones.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    /// Hands in chronological order.
    pub hands: Vec<Hand>,
    /// One diagnostic per dropped hand or record.
    pub skipped: Vec<SkippedHandInfo>,
}

impl Reconstruction {
    /// Number of dropped hands.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Append another reconstruction's hands and diagnostics.
    pub fn extend(&mut self, other: Self) {
        self.hands.extend(other.hands);
        self.skipped.extend(other.skipped);
    }

    /// Fail with [`ConvertError::SpectatorLog`] if hands exist but none has hero cards.
    ///
    /// An empty result is not a spectator log.
    pub fn ensure_hero_perspective(&self) -> Result<()> {
        if !self.hands.is_empty() && !self.hands.iter().any(Hand::has_hero_cards) {
            warn!(hands = self.hands.len(), "No hand carries hero cards");
            return Err(ConvertError::SpectatorLog);
        }
        Ok(())
    }
}

/// Seat-cap and player-count rules shared by every input format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterPolicy {
    filter: PlayerCountFilter,
}

impl RosterPolicy {
    /// Create a policy with the given player-count filter.
    #[must_use]
    pub const fn new(filter: PlayerCountFilter) -> Self {
        Self { filter }
    }

    /// Reason and detail for rejecting a roster of `player_count`, if rejected.
    #[must_use]
    pub fn check(&self, player_count: usize) -> Option<(SkipReason, String)> {
        if player_count > MAX_PLAYERS {
            return Some((
                SkipReason::TooManyPlayers,
                format!("{player_count} players exceeds the {MAX_PLAYERS}-max limit"),
            ));
        }
        if !self.filter.allows(player_count) {
            return Some((
                SkipReason::FilteredOut,
                format!(
                    "{player_count} players does not match the player-count filter ({})",
                    self.filter
                ),
            ));
        }
        None
    }
}

/// A hand between its start marker and its end marker.
#[derive(Debug)]
struct OpenHand {
    hand: Hand,
    street: Street,
    start_index: usize,
}

impl OpenHand {
    fn advance(&mut self, street: Street) {
        self.street = self.street.max(street);
    }

    fn push(&mut self, action: Action) {
        self.hand.actions.push(action);
    }
}

/// Mutable state threaded through one reconstruction pass.
#[derive(Debug, Default)]
struct ParseContext {
    open: Option<OpenHand>,
    result: Reconstruction,
}

impl ParseContext {
    fn skip(&mut self, hand: &Hand, reason: SkipReason, detail: String, player_count: usize, raw: &[LogEntry]) {
        warn!(
            hand_number = %hand.hand_number,
            reason = %reason,
            detail = %detail,
            "Skipping hand"
        );
        self.result.skipped.push(SkippedHandInfo {
            hand_id: hand.hand_id.clone(),
            hand_number: hand.hand_number.clone(),
            reason,
            detail,
            player_count,
            raw_input: raw.iter().map(|e| e.text.clone()).collect(),
        });
    }
}

/// State machine that turns chronological log entries into hands.
#[derive(Debug, Clone, Default)]
pub struct HandReconstructor {
    policy: RosterPolicy,
}

impl HandReconstructor {
    /// Create a reconstructor applying `filter` to every roster.
    #[must_use]
    pub fn new(filter: PlayerCountFilter) -> Self {
        Self {
            policy: RosterPolicy::new(filter),
        }
    }

    /// Roster rules in use.
    #[must_use]
    pub const fn policy(&self) -> RosterPolicy {
        self.policy
    }

    /// Reconstruct hands from entries in chronological order.
    ///
    /// Fails on a malformed number inside a recognized line and on a
    /// spectator log. Hands dropped by roster rules or left unterminated are
    /// reported in [`Reconstruction::skipped`].
    #[instrument(skip_all, fields(entries = entries.len()), level = "debug")]
    pub fn reconstruct(&self, entries: &[LogEntry]) -> Result<Reconstruction> {
        let mut ctx = ParseContext::default();

        for (index, entry) in entries.iter().enumerate() {
            let Some(event) = classify(&entry.text, index + 1, ctx.open.is_some())? else {
                continue;
            };
            self.apply(&mut ctx, event, index, entries);
        }

        if let Some(open) = ctx.open.take() {
            let detail = format!(
                "hand #{} was not ended before the end of the log",
                open.hand.hand_number
            );
            let player_count = open.hand.players.len();
            ctx.skip(
                &open.hand,
                SkipReason::Incomplete,
                detail,
                player_count,
                &entries[open.start_index..],
            );
        }

        let result = ctx.result;
        debug!(
            hands = result.hands.len(),
            skipped = result.skipped_count(),
            "Reconstruction complete"
        );
        result.ensure_hero_perspective()?;
        Ok(result)
    }

    fn apply(&self, ctx: &mut ParseContext, event: LogEvent, index: usize, entries: &[LogEntry]) {
        match event {
            LogEvent::HandStart { number, id, dealer } => {
                if let Some(previous) = ctx.open.take() {
                    let detail = format!(
                        "hand #{} was not ended before hand #{number} started",
                        previous.hand.hand_number
                    );
                    let player_count = previous.hand.players.len();
                    ctx.skip(
                        &previous.hand,
                        SkipReason::Incomplete,
                        detail,
                        player_count,
                        &entries[previous.start_index..index],
                    );
                }

                let hand_id = coerce_hand_id(id.as_deref().unwrap_or(&number));
                let dealer = dealer.as_deref().map(display_name).unwrap_or_default();
                ctx.open = Some(OpenHand {
                    hand: Hand::new(number, hand_id, dealer, entries[index].at),
                    street: Street::Preflop,
                    start_index: index,
                });
            }
            LogEvent::HandEnd { .. } => {
                if let Some(open) = ctx.open.take() {
                    debug!(
                        hand_number = %open.hand.hand_number,
                        actions = open.hand.actions.len(),
                        "Sealed hand"
                    );
                    ctx.result.hands.push(open.hand);
                }
            }
            LogEvent::Roster(players) => {
                let Some(open) = ctx.open.as_mut() else {
                    return;
                };
                match self.policy.check(players.len()) {
                    None => open.hand.players = players,
                    Some((reason, detail)) => {
                        let Some(open) = ctx.open.take() else {
                            return;
                        };
                        let end = hand_span_end(entries, open.start_index, &open.hand.hand_number);
                        ctx.skip(
                            &open.hand,
                            reason,
                            detail,
                            players.len(),
                            &entries[open.start_index..end],
                        );
                    }
                }
            }
            event => {
                if let Some(open) = ctx.open.as_mut() {
                    apply_to_open_hand(open, event);
                }
            }
        }
    }

    /// Apply roster rules to hands decoded from JSON.
    ///
    /// Seats must already be renumbered. Rejected hands are reported without
    /// raw input lines.
    pub fn admit(&self, hands: Vec<Hand>) -> Reconstruction {
        let mut result = Reconstruction::default();
        for hand in hands {
            match self.policy.check(hand.players.len()) {
                None => result.hands.push(hand),
                Some((reason, detail)) => {
                    warn!(hand_number = %hand.hand_number, reason = %reason, "Skipping hand");
                    result.skipped.push(SkippedHandInfo {
                        hand_id: hand.hand_id,
                        hand_number: hand.hand_number,
                        reason,
                        detail,
                        player_count: hand.players.len(),
                        raw_input: Vec::new(),
                    });
                }
            }
        }
        result
    }
}

fn apply_to_open_hand(open: &mut OpenHand, event: LogEvent) {
    match event {
        LogEvent::HeroCards(cards) => open.hand.hero_cards = cards,
        LogEvent::ForcedBet {
            player,
            kind,
            amount,
        } => {
            match kind {
                ActionKind::PostAnte => open.hand.ante = amount,
                ActionKind::PostSmallBlind => open.hand.small_blind = amount,
                _ => open.hand.big_blind = amount,
            }
            let street = open.street;
            open.push(Action::new(player, kind, amount, street));
        }
        LogEvent::Flop(cards) => {
            open.advance(Street::Flop);
            if cards.len() >= 3 {
                open.hand.board.flop = cards[..3].to_vec();
            }
        }
        LogEvent::Turn(card) => {
            open.advance(Street::Turn);
            open.hand.board.turn = Some(card);
        }
        LogEvent::River(card) => {
            open.advance(Street::River);
            open.hand.board.river = Some(card);
        }
        LogEvent::Voluntary {
            player,
            kind,
            amount,
            all_in,
        } => {
            let street = open.street;
            open.push(Action::new(player, kind, amount, street).with_all_in(all_in));
        }
        LogEvent::Show { player, cards } => {
            open.push(Action::new(&player, ActionKind::Show, 0, Street::Showdown));
            open.hand.record_show(&player, cards);
        }
        LogEvent::Collect { player, amount } => {
            open.push(Action::new(&player, ActionKind::Collect, amount, Street::Showdown));
            open.hand.record_collect(&player, amount);
        }
        LogEvent::UncalledReturn { player, amount } => {
            let street = open.street;
            open.push(Action::new(player, ActionKind::UncalledReturn, amount, street));
        }
        LogEvent::HandStart { .. } | LogEvent::HandEnd { .. } | LogEvent::Roster(_) => {}
    }
}

/// Exclusive end index of a hand's raw lines: through its end marker, or to
/// the end of input when the marker never comes.
fn hand_span_end(entries: &[LogEntry], start: usize, hand_number: &str) -> usize {
    entries[start..]
        .iter()
        .position(|e| hand_end_number(&e.text) == Some(hand_number))
        .map_or(entries.len(), |offset| start + offset + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn entries(lines: &[&str]) -> Vec<LogEntry> {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        lines
            .iter()
            .enumerate()
            .map(|(i, text)| LogEntry::new(*text, base + Duration::seconds(i as i64), i as i64))
            .collect()
    }

    fn start(number: u32) -> String {
        format!(
            r#"-- starting hand #{number} (id: h{number}) (No Limit Texas Hold'em) (dealer: "alice @ a1") --"#
        )
    }

    fn end(number: u32) -> String {
        format!("-- ending hand #{number} --")
    }

    fn simple_hand(number: u32) -> Vec<String> {
        vec![
            start(number),
            r#"Player stacks: #1 "alice @ a1" (1000) | #3 "bob @ b2" (1000)"#.to_string(),
            "Your hand is A♥, K♦".to_string(),
            r#""alice @ a1" posts a small blind of 10"#.to_string(),
            r#""bob @ b2" posts a big blind of 20"#.to_string(),
            r#""alice @ a1" folds"#.to_string(),
            r#"Uncalled bet of 10 returned to "bob @ b2""#.to_string(),
            r#""bob @ b2" collected 20 from pot"#.to_string(),
            end(number),
        ]
    }

    fn run(lines: &[String], filter: PlayerCountFilter) -> Result<Reconstruction> {
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        HandReconstructor::new(filter).reconstruct(&entries(&refs))
    }

    #[test]
    fn test_well_formed_hands_in_order() {
        let mut lines = simple_hand(1);
        lines.extend(simple_hand(2));
        lines.extend(simple_hand(3));

        let result = run(&lines, PlayerCountFilter::ALL).unwrap();
        let numbers: Vec<&str> = result.hands.iter().map(|h| h.hand_number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
        assert_eq!(result.skipped_count(), 0);
    }

    #[test]
    fn test_hand_fields() {
        let result = run(&simple_hand(7), PlayerCountFilter::ALL).unwrap();
        let hand = &result.hands[0];

        assert_eq!(hand.hand_id, coerce_hand_id("h7"));
        assert_eq!(hand.dealer, "alice");
        assert_eq!(hand.small_blind, 10);
        assert_eq!(hand.big_blind, 20);
        assert_eq!(hand.hero_cards, vec!["Ah", "Kd"]);
        assert_eq!(hand.players[1].seat, 2);
        assert_eq!(hand.dealer_seat(), Some(1));
        assert_eq!(
            hand.actions.last(),
            Some(&Action::new("bob", ActionKind::Collect, 20, Street::Showdown))
        );
        assert_eq!(hand.actions[3].kind, ActionKind::UncalledReturn);
        assert_eq!(hand.actions[3].street, Street::Preflop);
        assert_eq!(hand.total_pot(), 20);
    }

    #[test]
    fn test_hand_without_id_uses_number() {
        let mut lines = simple_hand(42);
        lines[0] = r#"-- starting hand #42 (No Limit Texas Hold'em) (dead button) --"#.to_string();
        let result = run(&lines, PlayerCountFilter::ALL).unwrap();
        assert_eq!(result.hands[0].hand_id, "42");
        assert_eq!(result.hands[0].dealer, "");
    }

    #[test]
    fn test_streets_advance() {
        let lines = vec![
            start(1),
            r#"Player stacks: #1 "alice @ a1" (1000) | #2 "bob @ b2" (1000)"#.to_string(),
            "Your hand is A♥, K♦".to_string(),
            "Flop:  [J♠, 10♦, 5♥]".to_string(),
            r#""alice @ a1" bets 50"#.to_string(),
            "Turn: J♠, 10♦, 5♥ [2♣]".to_string(),
            r#""bob @ b2" checks"#.to_string(),
            "River: J♠, 10♦, 5♥, 2♣ [A♥]".to_string(),
            r#""alice @ a1" raises to 400 and go all in"#.to_string(),
            end(1),
        ];
        let hand = run(&lines, PlayerCountFilter::ALL).unwrap().hands.remove(0);

        assert_eq!(hand.board.cards(), vec!["Js", "Td", "5h", "2c", "Ah"]);
        let streets: Vec<Street> = hand.actions.iter().map(|a| a.street).collect();
        assert_eq!(streets, vec![Street::Flop, Street::Turn, Street::River]);
        assert!(hand.actions[2].all_in);
    }

    #[test]
    fn test_incomplete_hand_is_reported() {
        let mut lines = simple_hand(1);
        lines.pop();
        lines.extend(simple_hand(2));

        let result = run(&lines, PlayerCountFilter::ALL).unwrap();
        assert_eq!(result.hands.len(), 1);
        assert_eq!(result.hands[0].hand_number, "2");

        let skip = &result.skipped[0];
        assert_eq!(skip.reason, SkipReason::Incomplete);
        assert!(skip.detail.contains("#1") && skip.detail.contains("#2"), "{}", skip.detail);
        assert_eq!(skip.raw_input.len(), 8);
    }

    #[test]
    fn test_hand_open_at_end_of_input_is_incomplete() {
        let mut lines = simple_hand(1);
        lines.extend(simple_hand(2));
        lines.pop();

        let result = run(&lines, PlayerCountFilter::ALL).unwrap();
        assert_eq!(result.hands.len(), 1);
        assert_eq!(result.hands[0].hand_number, "1");

        let skip = &result.skipped[0];
        assert_eq!(skip.reason, SkipReason::Incomplete);
        assert!(skip.detail.contains("end of the log"), "{}", skip.detail);
        assert_eq!(skip.raw_input.len(), 8);
        assert_eq!(skip.raw_input.first(), Some(&start(2)));
    }

    #[test]
    fn test_too_many_players_skips_until_end_marker() {
        let seats: Vec<String> = (1..=11).map(|i| format!(r#"#{i} "p{i} @ id{i}" (100)"#)).collect();
        let lines = vec![
            start(1),
            format!("Player stacks: {}", seats.join(" | ")),
            r#""p1 @ id1" folds"#.to_string(),
            end(1),
            "noise after the hand".to_string(),
        ];
        let mut with_hero = lines.clone();
        with_hero.extend(simple_hand(2));

        let result = run(&with_hero, PlayerCountFilter::ALL).unwrap();
        assert_eq!(result.hands.len(), 1);
        let skip = &result.skipped[0];
        assert_eq!(skip.reason, SkipReason::TooManyPlayers);
        assert_eq!(skip.player_count, 11);
        assert_eq!(skip.raw_input.len(), 4);
        assert_eq!(skip.raw_input.last().map(String::as_str), Some("-- ending hand #1 --"));
    }

    #[test]
    fn test_too_many_players_regardless_of_filter() {
        let seats: Vec<String> = (1..=11).map(|i| format!(r#"#{i} "p{i} @ id{i}" (100)"#)).collect();
        let mut lines = vec![start(1), format!("Player stacks: {}", seats.join(" | ")), end(1)];
        lines.extend(simple_hand(2));

        let filter = PlayerCountFilter::HEADS_UP | PlayerCountFilter::SPIN_AND_GO | PlayerCountFilter::MTT;
        let result = run(&lines, filter).unwrap();
        assert_eq!(result.skipped[0].reason, SkipReason::TooManyPlayers);
    }

    #[test]
    fn test_filtered_out_span_runs_to_end_of_input() {
        let mut lines = simple_hand(1);
        lines.pop();
        let mut all = simple_hand(2);
        all.extend(lines);

        let result = run(&all, PlayerCountFilter::SPIN_AND_GO);
        // Every hand is heads-up, so nothing is produced.
        let result = result.unwrap();
        assert!(result.hands.is_empty());
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.skipped[1].reason, SkipReason::FilteredOut);
        assert_eq!(result.skipped[1].raw_input.len(), 8);
    }

    #[test]
    fn test_spectator_log() {
        let mut lines = simple_hand(1);
        lines.retain(|l| !l.starts_with("Your hand"));
        let err = run(&lines, PlayerCountFilter::ALL).unwrap_err();
        assert!(err.is_spectator_log());
    }

    #[test]
    fn test_empty_input_is_not_spectator() {
        let result = HandReconstructor::default().reconstruct(&[]).unwrap();
        assert!(result.hands.is_empty());
        assert_eq!(result.skipped_count(), 0);
    }

    #[test]
    fn test_lines_outside_hands_are_ignored() {
        let mut lines = vec![
            r#""ghost @ g" bets 99999999999999999999999"#.to_string(),
            end(0),
        ];
        lines.extend(simple_hand(1));
        let result = run(&lines, PlayerCountFilter::ALL).unwrap();
        assert_eq!(result.hands.len(), 1);
    }

    #[test]
    fn test_bad_number_inside_hand_aborts() {
        let mut lines = simple_hand(1);
        lines.insert(6, r#""bob @ b2" calls 99999999999999999999999"#.to_string());
        let err = run(&lines, PlayerCountFilter::ALL).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { line: 7, .. }), "{err}");
    }

    #[test]
    fn test_showdown_split_pot() {
        let lines = vec![
            start(1),
            r#"Player stacks: #2 "alice @ a1" (1000) | #4 "bob @ b2" (1000)"#.to_string(),
            "Your hand is A♥, K♦".to_string(),
            r#""alice @ a1" posts a small blind of 10"#.to_string(),
            r#""bob @ b2" posts a big blind of 20"#.to_string(),
            r#""alice @ a1" calls 20"#.to_string(),
            r#""bob @ b2" checks"#.to_string(),
            r#""alice @ a1" shows a A♥, K♦."#.to_string(),
            r#""bob @ b2" shows a A♣, K♠."#.to_string(),
            r#""alice @ a1" collected 20 from pot"#.to_string(),
            r#""bob @ b2" collected 20 from pot"#.to_string(),
            end(1),
        ];
        let hand = run(&lines, PlayerCountFilter::ALL).unwrap().hands.remove(0);
        assert_eq!(hand.winners.len(), 2);
        assert_eq!(hand.winners[0].amount, 20);
        assert_eq!(hand.winners[1].hand_cards, vec!["Ac", "Ks"]);
        assert!(hand.has_showdown());
    }

    #[test]
    fn test_admit_applies_roster_rules() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let mut heads_up = Hand::new("1", "1", "", at);
        heads_up.players = (1..=2)
            .map(|seat| crate::model::Player {
                seat,
                name: format!("p{seat}"),
                display_name: format!("p{seat}"),
                stack: 100,
            })
            .collect();
        let mut six_max = heads_up.clone();
        six_max.hand_number = "2".into();
        six_max.players = (1..=6)
            .map(|seat| crate::model::Player {
                seat,
                name: format!("p{seat}"),
                display_name: format!("p{seat}"),
                stack: 100,
            })
            .collect();

        let result = HandReconstructor::new(PlayerCountFilter::HEADS_UP).admit(vec![heads_up, six_max]);
        assert_eq!(result.hands.len(), 1);
        assert_eq!(result.skipped[0].reason, SkipReason::FilteredOut);
        assert_eq!(result.skipped[0].player_count, 6);
    }
}
