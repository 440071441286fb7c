//! Synthetic PokerNow log generators.
//!
//! This module provides utilities for generating synthetic PokerNow CSV
//! logs for testing purposes. Logs are written newest entry first, the way
//! PokerNow exports them.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;

/// Configuration for generating synthetic logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Number of hands.
    pub hands: usize,
    /// Players seated at the table.
    pub players: usize,
    /// Write the hero's hole cards for every hand.
    pub hero_dealt_in: bool,
    /// Every this many hands goes to showdown, 0 for never.
    pub showdown_every: usize,
    /// Timestamp of the first entry.
    pub start_time: DateTime<Utc>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            hands: 10,
            players: 6,
            hero_dealt_in: true,
            showdown_every: 3,
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }
}

impl LogConfig {
    /// Create a minimal log.
    pub fn minimal() -> Self {
        Self {
            hands: 1,
            players: 2,
            ..Default::default()
        }
    }

    /// Create a large log.
    pub fn large() -> Self {
        Self {
            hands: 500,
            players: 9,
            ..Default::default()
        }
    }
}

/// Identity string of the player in `seat`.
pub fn identity(seat: usize) -> String {
    format!("player{seat} @ ID{seat:04}")
}

/// Display name of the player in `seat`.
pub fn player_name(seat: usize) -> String {
    format!("player{seat}")
}

/// Entry texts of one hand in chronological order.
pub fn hand_lines(number: usize, players: usize, hero_dealt_in: bool, showdown: bool) -> Vec<String> {
    let seats: Vec<usize> = (1..=players).collect();
    let dealer = seats[number % players];
    let sb = seats[(number + 1) % players];
    let bb = seats[(number + 2) % players];
    let q = |seat: usize| format!("\"{}\"", identity(seat));

    let roster = seats
        .iter()
        .map(|&s| format!("#{s} {} (10000)", q(s)))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![
        format!(
            "-- starting hand #{number} (id: gen{number:05})  (No Limit Texas Hold'em) (dealer: {}) --",
            q(dealer)
        ),
        format!("Player stacks: {roster}"),
    ];
    if hero_dealt_in {
        lines.push("Your hand is A♥, 10♦".to_string());
    }
    lines.push(format!("{} posts a small blind of 10", q(sb)));
    lines.push(format!("{} posts a big blind of 20", q(bb)));

    let others: Vec<usize> = seats
        .iter()
        .copied()
        .filter(|&s| s != sb && s != bb)
        .collect();

    if showdown {
        for &s in &others {
            lines.push(format!("{} folds", q(s)));
        }
        lines.push(format!("{} calls 20", q(sb)));
        lines.push(format!("{} checks", q(bb)));
        lines.push("Flop:  [2♣, 7♦, J♥]".to_string());
        lines.push(format!("{} bets 40", q(sb)));
        lines.push(format!("{} calls 40", q(bb)));
        lines.push("Turn: 2♣, 7♦, J♥ [Q♠]".to_string());
        lines.push(format!("{} checks", q(sb)));
        lines.push(format!("{} checks", q(bb)));
        lines.push("River: 2♣, 7♦, J♥, Q♠ [3♦]".to_string());
        lines.push(format!("{} checks", q(sb)));
        lines.push(format!("{} checks", q(bb)));
        lines.push(format!("{} shows a K♠, K♦.", q(sb)));
        lines.push(format!("{} shows a 9♠, 9♦.", q(bb)));
        lines.push(format!(
            "{} collected 120 from pot with Pair, K's (combination: K♠, K♦, Q♠, J♥, 7♦)",
            q(sb)
        ));
    } else {
        for &s in &others {
            lines.push(format!("{} folds", q(s)));
        }
        lines.push(format!("{} folds", q(sb)));
        lines.push(format!("Uncalled bet of 10 returned to {}", q(bb)));
        lines.push(format!("{} collected 20 from pot", q(bb)));
    }
    lines.push(format!("-- ending hand #{number} --"));
    lines
}

/// All entry texts of a generated log in chronological order.
pub fn log_lines(config: &LogConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for number in 1..=config.hands {
        let showdown = config.showdown_every > 0 && number % config.showdown_every == 0;
        lines.extend(hand_lines(number, config.players, config.hero_dealt_in, showdown));
    }
    lines
}

/// Write entry texts as a PokerNow CSV log, newest first.
pub fn write_log<W: Write>(lines: &[String], start: DateTime<Utc>, writer: W) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["entry", "at", "order"])?;
    for (index, text) in lines.iter().enumerate().rev() {
        let at = start + Duration::seconds(index as i64);
        let stamp = at.to_rfc3339();
        let order = at.timestamp_millis().to_string();
        csv.write_record([text.as_str(), stamp.as_str(), order.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Generate a complete CSV log.
pub fn generate_log(config: &LogConfig) -> String {
    let mut out = Vec::new();
    write_log(&log_lines(config), config.start_time, &mut out).expect("write to Vec");
    String::from_utf8(out).expect("generated log is UTF-8")
}
