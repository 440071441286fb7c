//! Ordered recognizer table for PokerNow log lines.
//!
//! Each recognizer pairs a pattern with a builder that turns the captures
//! into a [`LogEvent`]. The table is evaluated top to bottom and the first
//! match wins, so every all-in pattern sits above its plain counterpart.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{ConvertError, Result};
use crate::model::{ActionKind, Player};
use crate::util::{display_name, normalize_card, parse_cards, renumber_seats};

/// A classified log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// `-- starting hand #N (id: X) (No Limit Texas Hold'em) (dealer: "D") --`
    HandStart {
        /// Site hand number.
        number: String,
        /// Site hand id, if logged.
        id: Option<String>,
        /// Raw dealer identity, `None` for a dead button.
        dealer: Option<String>,
    },
    /// `-- ending hand #N --`
    HandEnd {
        /// Site hand number.
        number: String,
    },
    /// `Player stacks: #1 "a @ x" (100) | ...`, already renumbered.
    Roster(Vec<Player>),
    /// `Your hand is A♥, 4♦`
    HeroCards(Vec<String>),
    /// Ante and blind posts.
    ForcedBet {
        /// Display name of the poster.
        player: String,
        /// One of the forced-bet kinds.
        kind: ActionKind,
        /// Posted amount.
        amount: u64,
    },
    /// First three board cards.
    Flop(Vec<String>),
    /// Fourth board card.
    Turn(String),
    /// Fifth board card.
    River(String),
    /// Fold, check, call, bet or raise.
    Voluntary {
        /// Display name of the actor.
        player: String,
        /// Action kind.
        kind: ActionKind,
        /// Amount, zero for fold and check.
        amount: u64,
        /// Whether the action was all in.
        all_in: bool,
    },
    /// `"a @ x" shows a A♥, A♦.`
    Show {
        /// Display name.
        player: String,
        /// Revealed cards.
        cards: Vec<String>,
    },
    /// `"a @ x" collected 300 from pot`
    Collect {
        /// Display name.
        player: String,
        /// Amount collected.
        amount: u64,
    },
    /// `Uncalled bet of 50 returned to "a @ x"`
    UncalledReturn {
        /// Display name.
        player: String,
        /// Returned amount.
        amount: u64,
    },
}

/// When a recognizer is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Hand boundaries, checked on every line.
    Always,
    /// Everything else, only checked while a hand is open.
    InHand,
}

type Builder = fn(&Captures<'_>, usize) -> Result<LogEvent>;

struct Recognizer {
    name: &'static str,
    scope: Scope,
    pattern: Regex,
    build: Builder,
}

impl Recognizer {
    fn new(name: &'static str, scope: Scope, pattern: &str, build: Builder) -> Self {
        Self {
            name,
            scope,
            pattern: Regex::new(pattern).unwrap(),
            build,
        }
    }
}

static HAND_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-- ending hand #(\d+) --$").unwrap());

static STACK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"#(\d+) "(.+?)" \((\d+)\)"#).unwrap());

static RECOGNIZERS: Lazy<Vec<Recognizer>> = Lazy::new(|| {
    use Scope::{Always, InHand};

    vec![
        Recognizer::new(
            "hand_start",
            Always,
            r#"^-- starting hand #(\d+)\s+(?:\(id: ([A-Za-z0-9_-]+)\)\s+)?\(No Limit Texas Hold'em\)\s+(?:\(dealer: "(.+?)"\)|\(dead button\)) --$"#,
            |c, _| {
                Ok(LogEvent::HandStart {
                    number: c[1].to_string(),
                    id: c.get(2).map(|m| m.as_str().to_string()),
                    dealer: c.get(3).map(|m| m.as_str().to_string()),
                })
            },
        ),
        Recognizer::new("hand_end", Always, HAND_END.as_str(), |c, _| {
            Ok(LogEvent::HandEnd {
                number: c[1].to_string(),
            })
        }),
        Recognizer::new("roster", InHand, r"Player stacks: (.+)$", |c, line| {
            parse_roster(&c[1], line).map(LogEvent::Roster)
        }),
        Recognizer::new("hero_cards", InHand, r"^Your hand is (.+)$", |c, _| {
            Ok(LogEvent::HeroCards(parse_cards(&c[1])))
        }),
        Recognizer::new(
            "ante",
            InHand,
            r#"^"(.+?)" posts an ante of (\d+)$"#,
            |c, line| forced(c, line, ActionKind::PostAnte),
        ),
        Recognizer::new(
            "small_blind",
            InHand,
            r#"^"(.+?)" posts a small blind of (\d+)$"#,
            |c, line| forced(c, line, ActionKind::PostSmallBlind),
        ),
        Recognizer::new(
            "big_blind",
            InHand,
            r#"^"(.+?)" posts a big blind of (\d+)$"#,
            |c, line| forced(c, line, ActionKind::PostBigBlind),
        ),
        Recognizer::new("flop", InHand, r"^Flop:\s+\[([^\]]+)\]$", |c, _| {
            Ok(LogEvent::Flop(parse_cards(&c[1])))
        }),
        Recognizer::new("turn", InHand, r"^Turn: [^\[]+\[([^\]]+)\]$", |c, _| {
            Ok(LogEvent::Turn(normalize_card(&c[1])))
        }),
        Recognizer::new("river", InHand, r"^River: [^\[]+\[([^\]]+)\]$", |c, _| {
            Ok(LogEvent::River(normalize_card(&c[1])))
        }),
        Recognizer::new("fold", InHand, r#"^"(.+?)" folds$"#, |c, _| {
            Ok(voluntary(c, ActionKind::Fold, 0, false))
        }),
        Recognizer::new("check", InHand, r#"^"(.+?)" checks$"#, |c, _| {
            Ok(voluntary(c, ActionKind::Check, 0, false))
        }),
        Recognizer::new(
            "call_all_in",
            InHand,
            r#"^"(.+?)" calls (\d+) and go all in$"#,
            |c, line| Ok(voluntary(c, ActionKind::Call, amount(c, 2, "call amount", line)?, true)),
        ),
        Recognizer::new("call", InHand, r#"^"(.+?)" calls (\d+)$"#, |c, line| {
            Ok(voluntary(c, ActionKind::Call, amount(c, 2, "call amount", line)?, false))
        }),
        Recognizer::new(
            "bet_all_in",
            InHand,
            r#"^"(.+?)" bets (\d+) and go all in$"#,
            |c, line| Ok(voluntary(c, ActionKind::Bet, amount(c, 2, "bet amount", line)?, true)),
        ),
        Recognizer::new("bet", InHand, r#"^"(.+?)" bets (\d+)$"#, |c, line| {
            Ok(voluntary(c, ActionKind::Bet, amount(c, 2, "bet amount", line)?, false))
        }),
        Recognizer::new(
            "raise_all_in",
            InHand,
            r#"^"(.+?)" raises to (\d+) and go all in$"#,
            |c, line| {
                Ok(voluntary(c, ActionKind::Raise, amount(c, 2, "raise amount", line)?, true))
            },
        ),
        Recognizer::new("raise", InHand, r#"^"(.+?)" raises to (\d+)$"#, |c, line| {
            Ok(voluntary(c, ActionKind::Raise, amount(c, 2, "raise amount", line)?, false))
        }),
        Recognizer::new("show", InHand, r#"^"(.+?)" shows a (.+)\.$"#, |c, _| {
            Ok(LogEvent::Show {
                player: display_name(&c[1]),
                cards: parse_cards(&c[2]),
            })
        }),
        Recognizer::new(
            "collect",
            InHand,
            r#"^"(.+?)" collected (\d+) from pot"#,
            |c, line| {
                Ok(LogEvent::Collect {
                    player: display_name(&c[1]),
                    amount: amount(c, 2, "collected amount", line)?,
                })
            },
        ),
        Recognizer::new(
            "uncalled",
            InHand,
            r#"^Uncalled bet of (\d+) returned to "(.+?)"$"#,
            |c, line| {
                Ok(LogEvent::UncalledReturn {
                    player: display_name(&c[2]),
                    amount: amount(c, 1, "uncalled amount", line)?,
                })
            },
        ),
    ]
});

/// Classify one log line.
///
/// `line` is the 1-based entry position used in error messages. When
/// `in_hand` is false only hand boundaries are recognized. Returns
/// `Ok(None)` for lines no recognizer claims.
pub fn classify(text: &str, line: usize, in_hand: bool) -> Result<Option<LogEvent>> {
    for recognizer in RECOGNIZERS.iter() {
        if recognizer.scope == Scope::InHand && !in_hand {
            continue;
        }
        if let Some(captures) = recognizer.pattern.captures(text) {
            tracing::trace!(line, recognizer = recognizer.name, "Recognized log line");
            return (recognizer.build)(&captures, line).map(Some);
        }
    }
    Ok(None)
}

/// Hand number of a `-- ending hand #N --` line.
pub fn hand_end_number(text: &str) -> Option<&str> {
    HAND_END
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn amount(captures: &Captures<'_>, group: usize, field: &str, line: usize) -> Result<u64> {
    let raw = &captures[group];
    raw.parse::<u64>()
        .map_err(|e| ConvertError::parse(line, field, format!("{raw:?}: {e}")))
}

fn forced(captures: &Captures<'_>, line: usize, kind: ActionKind) -> Result<LogEvent> {
    let field = match kind {
        ActionKind::PostAnte => "ante amount",
        ActionKind::PostSmallBlind => "small blind amount",
        _ => "big blind amount",
    };
    Ok(LogEvent::ForcedBet {
        player: display_name(&captures[1]),
        kind,
        amount: amount(captures, 2, field, line)?,
    })
}

fn voluntary(captures: &Captures<'_>, kind: ActionKind, amount: u64, all_in: bool) -> LogEvent {
    LogEvent::Voluntary {
        player: display_name(&captures[1]),
        kind,
        amount,
        all_in,
    }
}

/// Parse the body of a `Player stacks:` line and renumber its seats.
fn parse_roster(stacks: &str, line: usize) -> Result<Vec<Player>> {
    let mut players = Vec::new();
    for part in stacks.split('|').map(str::trim) {
        let Some(c) = STACK.captures(part) else {
            continue;
        };
        let seat = c[1]
            .parse::<u32>()
            .map_err(|e| ConvertError::parse(line, "seat number", format!("{:?}: {e}", &c[1])))?;
        let stack = amount(&c, 3, "stack", line)?;
        players.push(Player {
            seat,
            name: c[2].to_string(),
            display_name: display_name(&c[2]),
            stack,
        });
    }
    Ok(renumber_seats(players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event(text: &str) -> LogEvent {
        classify(text, 1, true).unwrap().unwrap()
    }

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(RECOGNIZERS.len(), 21);
    }

    #[test]
    fn test_hand_start_with_id_and_dealer() {
        let e = event(
            r#"-- starting hand #12 (id: ab12cd) (No Limit Texas Hold'em) (dealer: "whywaita @ DtjzvbAuKs") --"#,
        );
        assert_eq!(
            e,
            LogEvent::HandStart {
                number: "12".into(),
                id: Some("ab12cd".into()),
                dealer: Some("whywaita @ DtjzvbAuKs".into()),
            }
        );
    }

    #[test]
    fn test_hand_start_dead_button_without_id() {
        let e = event("-- starting hand #3 (No Limit Texas Hold'em) (dead button) --");
        assert_eq!(
            e,
            LogEvent::HandStart {
                number: "3".into(),
                id: None,
                dealer: None,
            }
        );
    }

    #[test]
    fn test_other_variants_are_not_hand_starts() {
        let text = r#"-- starting hand #3 (id: x1) (Pot Limit Omaha Hi) (dealer: "a @ b") --"#;
        assert_eq!(classify(text, 1, true).unwrap(), None);
    }

    #[test]
    fn test_only_boundaries_outside_hand() {
        assert_eq!(classify(r#""a @ b" folds"#, 1, false).unwrap(), None);
        assert_eq!(
            classify("-- ending hand #4 --", 1, false).unwrap(),
            Some(LogEvent::HandEnd { number: "4".into() })
        );
    }

    #[test]
    fn test_roster_is_renumbered() {
        let e = event(
            r#"Player stacks: #5 "ramune @ 3rSQmMhWok" (66998) | #9 "whywaita @ DtjzvbAuKs" (383002)"#,
        );
        let LogEvent::Roster(players) = e else {
            panic!("expected roster, got {e:?}");
        };
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].seat, 1);
        assert_eq!(players[0].display_name, "ramune");
        assert_eq!(players[0].stack, 66998);
        assert_eq!(players[1].seat, 2);
        assert_eq!(players[1].name, "whywaita @ DtjzvbAuKs");
    }

    #[test]
    fn test_all_in_variants_win_over_plain() {
        assert_eq!(
            event(r#""a @ x" calls 500 and go all in"#),
            LogEvent::Voluntary {
                player: "a".into(),
                kind: ActionKind::Call,
                amount: 500,
                all_in: true,
            }
        );
        assert_eq!(
            event(r#""a @ x" raises to 900 and go all in"#),
            LogEvent::Voluntary {
                player: "a".into(),
                kind: ActionKind::Raise,
                amount: 900,
                all_in: true,
            }
        );
        assert_eq!(
            event(r#""a @ x" bets 40"#),
            LogEvent::Voluntary {
                player: "a".into(),
                kind: ActionKind::Bet,
                amount: 40,
                all_in: false,
            }
        );
    }

    #[test]
    fn test_board_cards() {
        assert_eq!(
            event("Flop:  [J♠, 10♦, 5♥]"),
            LogEvent::Flop(vec!["Js".into(), "Td".into(), "5h".into()])
        );
        assert_eq!(event("Turn: J♠, 10♦, 5♥ [2♣]"), LogEvent::Turn("2c".into()));
        assert_eq!(
            event("River: J♠, 10♦, 5♥, 2♣ [A♥]"),
            LogEvent::River("Ah".into())
        );
    }

    #[test]
    fn test_show_collect_uncalled() {
        assert_eq!(
            event(r#""b @ y" shows a A♥, A♦."#),
            LogEvent::Show {
                player: "b".into(),
                cards: vec!["Ah".into(), "Ad".into()],
            }
        );
        assert_eq!(
            event(r#""b @ y" collected 300 from pot with Pair, A's (combination: A♥, A♦)"#),
            LogEvent::Collect {
                player: "b".into(),
                amount: 300,
            }
        );
        assert_eq!(
            event(r#"Uncalled bet of 50 returned to "b @ y""#),
            LogEvent::UncalledReturn {
                player: "b".into(),
                amount: 50,
            }
        );
    }

    #[test]
    fn test_overflowing_amount_is_a_parse_error() {
        let err = classify(r#""a @ x" bets 99999999999999999999999"#, 7, true).unwrap_err();
        assert!(
            matches!(err, ConvertError::Parse { line: 7, ref field, .. } if field == "bet amount"),
            "{err}"
        );
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        assert_eq!(
            classify("The admin approved the player", 1, true).unwrap(),
            None
        );
    }

    #[test]
    fn test_hand_end_number() {
        assert_eq!(hand_end_number("-- ending hand #17 --"), Some("17"));
        assert_eq!(hand_end_number("-- ending hand #x --"), None);
    }
}
