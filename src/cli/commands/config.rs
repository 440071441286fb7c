//! Config command implementation.
//!
//! View and initialize pokernow2hh configuration.

use std::path::PathBuf;

use crate::cli::{Cli, ConfigAction, ConfigArgs};
use crate::config::{default_config_path, Config};
use crate::error::{ConvertError, Result};

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_config_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

/// Path selected by `--config`, or the default location.
fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Show the effective configuration as TOML.
fn show_config(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let content = toml::to_string_pretty(&config).map_err(|e| ConvertError::InvalidConfig {
        message: format!("Failed to serialize config: {e}"),
    })?;
    print!("{content}");
    Ok(())
}

/// Show configuration file path.
fn show_config_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli)?;
    println!("{}", path.display());
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli)?;

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'pokernow2hh config init --force' to reset it to defaults.");
        return Ok(());
    }

    Config::default().save_to(&path)?;
    if !cli.quiet {
        println!("Created configuration file at: {}", path.display());
    }

    Ok(())
}
