//! Convert command implementation.
//!
//! Converts a PokerNow log into hand histories and reports skipped hands.

use std::io::{self, Write};

use tracing::info;

use crate::api::{convert, ConvertOptions};
use crate::cli::{Cli, ConvertArgs};
use crate::config::{parse_time_zone, ConvertDefaults};
use crate::error::{ConvertError, Result};
use crate::export::JsonExporter;
use crate::util::atomic_write;

use super::{filter_from_flags, read_input};

/// Run the convert command.
pub fn run(cli: &Cli, args: &ConvertArgs) -> Result<()> {
    let config = cli.load_config()?;
    let options = build_options(args, &config.convert)?;

    let data = read_input(args.input.as_deref())?;
    let result = convert(&data, &options).map_err(|e| {
        if e.is_spectator_log() && !cli.quiet {
            eprintln!(
                "This log was recorded by a spectator: no hand shows the hero's hole cards. \
                 Download the log from a seat you played."
            );
        }
        e
    })?;

    match &args.output {
        Some(path) => {
            atomic_write(path, &result.output)?;
            info!(path = %path.display(), hands = result.hands.len(), "Wrote hand histories");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&result.output)?;
            if !result.output.is_empty() && !result.output.ends_with(b"\n") {
                writeln!(stdout)?;
            }
            stdout.flush()?;
        }
    }

    if let Some(path) = &args.skipped_report {
        let mut report = Vec::new();
        JsonExporter::new()
            .pretty(true)
            .export_skipped(&result.skipped_hands_info, &mut report)?;
        atomic_write(path, &report)?;
    }

    if !cli.quiet {
        if let Some(path) = &args.output {
            eprintln!("Converted {} hands to {}", result.hands.len(), path.display());
        }
        if result.skipped_hands > 0 {
            eprintln!("{} hands were skipped.", result.skipped_hands);
        }
    }

    Ok(())
}

/// Merge command-line flags over the configuration defaults.
fn build_options(args: &ConvertArgs, defaults: &ConvertDefaults) -> Result<ConvertOptions> {
    let hero_name = args
        .hero_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| Some(defaults.hero_name.clone()).filter(|name| !name.trim().is_empty()))
        .ok_or_else(|| {
            ConvertError::invalid_argument(
                "hero-name",
                "required; pass --hero-name or set convert.hero_name in the config file",
            )
        })?;

    let time_zone = match &args.timezone {
        Some(name) => parse_time_zone(name)?,
        None => defaults.time_zone()?,
    };

    let filter = filter_from_flags(
        args.filter_hu,
        args.filter_spin_and_go,
        args.filter_mtt,
        defaults.filter()?,
    );

    let rake_percent = args.rake_percent.unwrap_or(defaults.rake_percent);
    let rake_cap_bb = args.rake_cap_bb.unwrap_or(defaults.rake_cap_bb);
    if rake_percent < 0.0 || rake_cap_bb < 0.0 {
        return Err(ConvertError::invalid_argument(
            "rake",
            "rake percentage and cap must not be negative",
        ));
    }

    let mut options = ConvertOptions::new(hero_name)
        .with_site_name(
            args.site_name
                .clone()
                .unwrap_or_else(|| defaults.site_name.clone()),
        )
        .with_time_zone(time_zone)
        .with_filter(filter)
        .with_rake(rake_percent, rake_cap_bb)
        .with_game_type(args.game_type.map_or(defaults.game_type, Into::into))
        .with_format(args.format.into());

    let tournament_name = args
        .tournament_name
        .clone()
        .unwrap_or_else(|| defaults.tournament_name.clone());
    if !tournament_name.is_empty() {
        options = options.with_tournament_name(tournament_name);
    }
    if let Some(id) = &args.tournament_id {
        options = options.with_tournament_id(id.clone());
    }

    Ok(options)
}
