//! PokerStars-style hand history export.
//!
//! Renders each [`Hand`] as a hand history: header, table and seat lines,
//! street blocks, showdown, and a per-seat summary. Hands are separated by
//! two blank lines.
//!
//! The tournament layout writes a freeroll header carrying a tournament id
//! and plain chip amounts. The cash layout writes a ring-game header, names
//! the table after the hand's site and table, prefixes amounts with `$`
//! unless the hand is played for chips, and spells raises as
//! `raises <increment> to <total>`.

use std::collections::HashMap;
use std::io::Write;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{ActionKind, Hand, Player, Street};

use super::{ExportOptions, GameType, HandExporter};

/// Timestamp layout of the hand header.
const HEADER_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// How one hand's amounts and raises are written.
#[derive(Debug, Clone, Copy)]
struct Layout {
    game_type: GameType,
    prefix: &'static str,
}

impl Layout {
    fn for_hand(hand: &Hand, game_type: GameType) -> Self {
        let prefix = if game_type == GameType::Cash && !hand.is_play_chips() {
            "$"
        } else {
            ""
        };
        Self { game_type, prefix }
    }

    fn chips(self, amount: u64) -> String {
        format!("{}{amount}", self.prefix)
    }

    fn fractional(self, amount: f64) -> String {
        format!("{}{}", self.prefix, format_amount(amount))
    }
}

/// Hand history text exporter.
#[derive(Debug, Clone, Default)]
pub struct HandHistoryExporter;

impl HandHistoryExporter {
    /// Create a new hand history exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_hand<W: Write>(
        &self,
        writer: &mut W,
        hand: &Hand,
        tournament_id: &str,
        options: &ExportOptions,
    ) -> Result<()> {
        let layout = Layout::for_hand(hand, options.game_type);
        let started = hand
            .start_time
            .with_timezone(&options.time_zone)
            .format(HEADER_TIME_FORMAT);
        match options.game_type {
            GameType::Tournament => writeln!(
                writer,
                "{} Hand #{}:  Tournament #{}, $0+$0 Hold'em No Limit - Level 1 ({}/{}) - {}",
                options.site_name, hand.hand_id, tournament_id, hand.small_blind, hand.big_blind, started
            )?,
            GameType::Cash => {
                let currency = if layout.prefix.is_empty() { "" } else { " USD" };
                writeln!(
                    writer,
                    "{} Hand #{}: Hold'em No Limit ({}/{}{}) - {} ET",
                    options.site_name,
                    hand.hand_id,
                    layout.chips(hand.small_blind),
                    layout.chips(hand.big_blind),
                    currency,
                    started
                )?;
            }
        }

        let table = match options.tournament_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => match options.game_type {
                GameType::Tournament => format!("PokerNow {tournament_id}"),
                GameType::Cash => hand.table_label(),
            },
        };
        writeln!(
            writer,
            "Table '{}' {}-max Seat #{} is the button",
            table,
            hand.players.len(),
            button_seat(hand)
        )?;

        for player in &hand.players {
            writeln!(
                writer,
                "Seat {}: {} ({} in chips)",
                player.seat,
                player.display_name,
                layout.chips(player.stack)
            )?;
        }

        writeln!(writer, "*** HOLE CARDS ***")?;
        if hand.has_hero_cards() {
            writeln!(
                writer,
                "Dealt to {} [{}]",
                options.hero_name,
                hand.hero_cards.join(" ")
            )?;
        }

        self.write_street(writer, hand, layout, Street::Preflop, None)?;
        let flop = hand.board.flop.join(" ");
        if !hand.board.flop.is_empty() {
            let header = format!("*** FLOP *** [{flop}]");
            self.write_street(writer, hand, layout, Street::Flop, Some(&header))?;
        }
        if let Some(turn) = &hand.board.turn {
            let header = format!("*** TURN *** [{flop}] [{turn}]");
            self.write_street(writer, hand, layout, Street::Turn, Some(&header))?;
        }
        if let Some(river) = &hand.board.river {
            let turn = hand.board.turn.as_deref().unwrap_or_default();
            let header = format!("*** RIVER *** [{flop} {turn}] [{river}]");
            self.write_street(writer, hand, layout, Street::River, Some(&header))?;
        }

        self.write_showdown(writer, hand, layout)?;
        self.write_summary(writer, hand, layout, options)
    }

    /// Write one street's actions. Streets after preflop are omitted when
    /// nothing happened on them.
    fn write_street<W: Write>(
        &self,
        writer: &mut W,
        hand: &Hand,
        layout: Layout,
        street: Street,
        header: Option<&str>,
    ) -> Result<()> {
        let mut actions = hand.actions_on(street).peekable();
        if actions.peek().is_none() && street != Street::Preflop {
            return Ok(());
        }
        if let Some(header) = header {
            writeln!(writer, "{header}")?;
        }

        // Chips each player has committed on this street, and the amount to call.
        let mut committed: HashMap<&str, u64> = HashMap::new();
        let mut current_bet = 0u64;

        for action in actions {
            let player = action.player.as_str();
            let all_in = if action.all_in { " and is all-in" } else { "" };
            match action.kind {
                ActionKind::PostSmallBlind | ActionKind::PostBigBlind => {
                    let blind = if action.kind == ActionKind::PostSmallBlind {
                        "small"
                    } else {
                        "big"
                    };
                    writeln!(writer, "{player}: posts {blind} blind {}", layout.chips(action.amount))?;
                    committed.insert(player, action.amount);
                    current_bet = current_bet.max(action.amount);
                }
                ActionKind::PostAnte => {
                    writeln!(writer, "{player}: posts an ante of {}", layout.chips(action.amount))?;
                }
                ActionKind::Fold => writeln!(writer, "{player}: folds")?,
                ActionKind::Check => writeln!(writer, "{player}: checks")?,
                ActionKind::Call => {
                    let already = committed.get(player).copied().unwrap_or(0);
                    let increment = current_bet.saturating_sub(already);
                    writeln!(writer, "{player}: calls {}{all_in}", layout.chips(increment))?;
                    committed.insert(player, current_bet);
                }
                ActionKind::Bet => {
                    writeln!(writer, "{player}: bets {}{all_in}", layout.chips(action.amount))?;
                    committed.insert(player, action.amount);
                    current_bet = action.amount;
                }
                ActionKind::Raise => {
                    // An all-in raise is logged net of the ante already posted.
                    let to = if action.all_in {
                        action.amount.saturating_add(hand.ante)
                    } else {
                        action.amount
                    };
                    match layout.game_type {
                        GameType::Tournament => writeln!(writer, "{player}: raises to {to}{all_in}")?,
                        GameType::Cash => writeln!(
                            writer,
                            "{player}: raises {} to {}{all_in}",
                            layout.chips(to.saturating_sub(current_bet)),
                            layout.chips(to)
                        )?,
                    }
                    committed.insert(player, to);
                    current_bet = to;
                }
                ActionKind::UncalledReturn => {
                    writeln!(
                        writer,
                        "Uncalled bet ({}) returned to {player}",
                        layout.chips(action.amount)
                    )?;
                }
                ActionKind::Show | ActionKind::Collect => {}
            }
        }
        Ok(())
    }

    fn write_showdown<W: Write>(&self, writer: &mut W, hand: &Hand, layout: Layout) -> Result<()> {
        if hand.has_showdown() {
            writeln!(writer, "*** SHOW DOWN ***")?;
            for show in hand.actions.iter().filter(|a| a.kind == ActionKind::Show) {
                let shown = hand
                    .winners
                    .iter()
                    .find(|w| w.player == show.player && !w.hand_cards.is_empty());
                if let Some(winner) = shown {
                    writeln!(
                        writer,
                        "{}: shows [{}]",
                        show.player,
                        winner.hand_cards.join(" ")
                    )?;
                }
            }
        } else {
            for winner in hand.winners.iter().filter(|w| w.amount > 0) {
                writeln!(writer, "{}: doesn't show hand", winner.player)?;
            }
        }

        for winner in hand.winners.iter().filter(|w| w.amount > 0) {
            writeln!(
                writer,
                "{} collected {} from pot",
                winner.player,
                layout.chips(winner.amount)
            )?;
        }
        Ok(())
    }

    fn write_summary<W: Write>(
        &self,
        writer: &mut W,
        hand: &Hand,
        layout: Layout,
        options: &ExportOptions,
    ) -> Result<()> {
        writeln!(writer, "*** SUMMARY ***")?;
        let pot = hand.total_pot();
        let rake = calculate_rake(pot, hand.big_blind, options.rake_percent, options.rake_cap_bb);
        writeln!(
            writer,
            "Total pot {} | Rake {}",
            layout.chips(pot),
            layout.fractional(rake)
        )?;
        if !hand.board.flop.is_empty() {
            writeln!(writer, "Board [{}]", hand.board.cards().join(" "))?;
        }

        for player in &hand.players {
            let role = seat_role(hand, player);
            match seat_outcome(hand, player, layout) {
                Some(outcome) => writeln!(
                    writer,
                    "Seat {}: {}{} {}",
                    player.seat, player.display_name, role, outcome
                )?,
                None => writeln!(writer, "Seat {}: {}{}", player.seat, player.display_name, role)?,
            }
        }
        Ok(())
    }
}

impl HandExporter for HandHistoryExporter {
    #[instrument(skip_all, fields(hands = hands.len()), level = "debug")]
    fn export_hands<W: Write>(
        &self,
        hands: &[Hand],
        writer: &mut W,
        options: &ExportOptions,
    ) -> Result<()> {
        let tournament_id = options
            .tournament_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| hands.first().map(|h| h.hand_id.as_str()))
            .unwrap_or_default();

        for (index, hand) in hands.iter().enumerate() {
            if index > 0 {
                write!(writer, "\n\n")?;
            }
            self.write_hand(writer, hand, tournament_id, options)?;
        }

        debug!(tournament_id, game_type = %options.game_type, "Rendered hand histories");
        Ok(())
    }
}

/// Seat shown as the button: the dealer's seat, or 1 for a dead button.
fn button_seat(hand: &Hand) -> u32 {
    hand.dealer_seat().unwrap_or(1)
}

/// Role suffix in the summary. Blinds take precedence over the button.
fn seat_role(hand: &Hand, player: &Player) -> &'static str {
    let name = player.display_name.as_str();
    if hand.poster_of(ActionKind::PostSmallBlind) == Some(name) {
        " (small blind)"
    } else if hand.poster_of(ActionKind::PostBigBlind) == Some(name) {
        " (big blind)"
    } else if player.seat == button_seat(hand) {
        " (button)"
    } else {
        ""
    }
}

fn seat_outcome(hand: &Hand, player: &Player, layout: Layout) -> Option<String> {
    let name = player.display_name.as_str();

    let won = hand
        .winners
        .iter()
        .find(|w| w.player == name)
        .map_or(0, |w| w.amount);
    if won > 0 {
        return Some(format!("collected ({})", layout.chips(won)));
    }

    let own_actions = || hand.actions.iter().filter(move |a| a.player == name);
    if own_actions().any(|a| a.kind == ActionKind::Show) {
        return Some("showed and lost".to_string());
    }

    let folded = own_actions().any(|a| a.kind == ActionKind::Fold);
    if !folded {
        return None;
    }
    let last_street = own_actions()
        .rev()
        .find(|a| a.kind == ActionKind::Fold || a.kind.is_voluntary_bet())
        .map_or(Street::Preflop, |a| a.street);
    let bet = own_actions().any(|a| a.kind.is_voluntary_bet());

    let mut outcome = format!("folded {}", fold_description(last_street));
    if !bet {
        outcome.push_str(" (didn't bet)");
    }
    Some(outcome)
}

const fn fold_description(street: Street) -> &'static str {
    match street {
        Street::Flop => "on the Flop",
        Street::Turn => "on the Turn",
        Street::River => "on the River",
        Street::Preflop | Street::Showdown => "before Flop",
    }
}

/// Rake for a pot: `percent` of the pot, capped at `cap_bb` big blinds when
/// the cap is positive. Zero when `percent` is not positive.
#[must_use]
pub fn calculate_rake(pot: u64, big_blind: u64, percent: f64, cap_bb: f64) -> f64 {
    if percent <= 0.0 {
        return 0.0;
    }
    let rake = pot as f64 * percent / 100.0;
    let cap = big_blind as f64 * cap_bb;
    if cap > 0.0 && rake > cap {
        cap
    } else {
        rake
    }
}

/// Format an amount without decimals when integral, otherwise with two.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount.trunc() == amount {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}
