//! Command-line interface for pokernow2hh.
//!
//! Provides scriptable access to the converter with four commands:
//! - `convert`: Convert a PokerNow log into hand histories
//! - `inspect`: Print the reconstructed hands as JSON
//! - `config`: View and initialize the configuration file
//! - `completions`: Generate shell completions

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::export::{ExportFormat, GameType};

/// Convert PokerNow logs into PokerStars-style hand histories.
#[derive(Debug, Parser)]
#[command(name = "pokernow2hh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true, env = "POKERNOW2HH_QUIET")]
    pub quiet: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "POKERNOW2HH_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "POKERNOW2HH_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "POKERNOW2HH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Load the configuration selected by `--config`, or the default file.
    ///
    /// An explicitly selected file must load. A broken default file is
    /// reported and replaced by the defaults.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Ok(Config::load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable configuration file");
                Config::default()
            })),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a PokerNow log into hand histories.
    #[command(alias = "c")]
    Convert(ConvertArgs),

    /// Print reconstructed hands and skip diagnostics as JSON.
    #[command(alias = "i")]
    Inspect(InspectArgs),

    /// View and initialize configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the convert command.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Input file (CSV log, JSON or JSON Lines). Reads stdin when omitted.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output file. Writes stdout when omitted.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Hero display name.
    #[arg(long, env = "POKERNOW2HH_HERO_NAME")]
    pub hero_name: Option<String>,

    /// IANA time zone for hand timestamps (e.g. Asia/Tokyo).
    #[arg(long)]
    pub timezone: Option<String>,

    /// Site label written in hand headers.
    #[arg(long)]
    pub site_name: Option<String>,

    /// Table name written instead of "PokerNow <tournament id>".
    #[arg(long)]
    pub tournament_name: Option<String>,

    /// Tournament id; defaults to the first hand's id.
    #[arg(long)]
    pub tournament_id: Option<String>,

    /// Keep heads-up hands (2 players).
    #[arg(long)]
    pub filter_hu: bool,

    /// Keep Spin & Go hands (3 players).
    #[arg(long)]
    pub filter_spin_and_go: bool,

    /// Keep multi-table hands (4-9 players).
    #[arg(long)]
    pub filter_mtt: bool,

    /// Hand history layout; defaults to the config file, then tournament.
    #[arg(long)]
    pub game_type: Option<GameTypeArg>,

    /// Rake percentage of the pot.
    #[arg(long)]
    pub rake_percent: Option<f64>,

    /// Rake cap in big blinds.
    #[arg(long)]
    pub rake_cap_bb: Option<f64>,

    /// Write skip diagnostics as JSON to this file.
    #[arg(long)]
    pub skipped_report: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormatArg,
}

/// Arguments for the inspect command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Input file. Reads stdin when omitted.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Keep heads-up hands (2 players).
    #[arg(long)]
    pub filter_hu: bool,

    /// Keep Spin & Go hands (3 players).
    #[arg(long)]
    pub filter_spin_and_go: bool,

    /// Keep multi-table hands (4-9 players).
    #[arg(long)]
    pub filter_mtt: bool,
}

/// Output formats for the convert command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormatArg {
    /// PokerStars-style hand history.
    #[default]
    Text,
    /// JSON envelope with the reconstructed hands.
    Json,
    /// Pretty-printed JSON.
    JsonPretty,
}

impl From<OutputFormatArg> for ExportFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => Self::HandHistory,
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::JsonPretty => Self::JsonPretty,
        }
    }
}

/// Hand history layouts for the convert command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameTypeArg {
    /// Freeroll tournament header, plain chip amounts.
    Tournament,
    /// Ring-game header, `$` amounts unless the hand is played for chips.
    Cash,
}

impl From<GameTypeArg> for GameType {
    fn from(arg: GameTypeArg) -> Self {
        match arg {
            GameTypeArg::Tournament => Self::Tournament,
            GameTypeArg::Cash => Self::Cash,
        }
    }
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show all configuration values.
    Show,

    /// Show configuration file path.
    Path,

    /// Initialize configuration file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, crate::NAME, &mut io::stdout());
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    // --quiet keeps only errors unless RUST_LOG says otherwise
    let level = if cli.quiet {
        LogLevel::Error
    } else {
        cli.log_level
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    match &cli.command {
        Commands::Convert(args) => commands::convert::run(&cli, args),
        Commands::Inspect(args) => commands::inspect::run(&cli, args),
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
