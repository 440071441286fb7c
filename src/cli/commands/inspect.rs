//! Inspect command implementation.
//!
//! Prints the reconstructed hands and the skip diagnostics as pretty JSON.

use std::io::{self, Write};

use crate::api::parse_hands;
use crate::cli::{Cli, InspectArgs};
use crate::error::Result;
use crate::export::JsonExporter;

use super::{filter_from_flags, read_input};

/// Run the inspect command.
pub fn run(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let config = cli.load_config()?;
    let filter = filter_from_flags(
        args.filter_hu,
        args.filter_spin_and_go,
        args.filter_mtt,
        config.convert.filter()?,
    );

    let data = read_input(args.input.as_deref())?;
    let reconstruction = parse_hands(&data, filter)?;

    let mut stdout = io::stdout().lock();
    JsonExporter::new().pretty(true).export_report(
        &reconstruction.hands,
        &reconstruction.skipped,
        &mut stdout,
    )?;
    stdout.flush()?;

    if !cli.quiet {
        eprintln!(
            "{} hands reconstructed, {} skipped.",
            reconstruction.hands.len(),
            reconstruction.skipped_count()
        );
    }
    Ok(())
}
