//! Error types for pokernow2hh.
//!
//! Conversion failures fall into three classes which callers are expected to
//! treat differently:
//!
//! - structural failures (bad header, bad JSON, a non-numeric field inside a
//!   recognized log line) abort the whole conversion;
//! - business-rule skips never surface here, they are reported as
//!   [`SkippedHandInfo`](crate::model::SkippedHandInfo) diagnostics;
//! - a spectator log is reported as [`ConvertError::SpectatorLog`] so the
//!   caller can word it differently from a corrupt input.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for pokernow2hh operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input did not have the expected shape (header, column count, JSON layout).
    #[error("Invalid input format: {message}")]
    Format {
        /// Human-readable error message.
        message: String,
    },

    /// A field inside a recognized record could not be parsed.
    #[error("Failed to parse {field} at line {line}: {message}")]
    Parse {
        /// 1-based entry or line position, 0 when unknown.
        line: usize,
        /// Name of the offending field.
        field: String,
        /// Human-readable error message.
        message: String,
    },

    /// JSON decoding failed.
    #[error("Failed to decode JSON: {context}")]
    Json {
        /// Context describing what was being decoded.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Delimited log could not be read.
    #[error("Failed to read log row: {source}")]
    Csv {
        /// Underlying csv error.
        #[source]
        source: csv::Error,
    },

    /// The log contains hands but none of them carries hero hole cards.
    #[error("spectator log detected: no hero cards found in any hand")]
    SpectatorLog,

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Rendering or serializing output failed.
    #[error("Export failed: {message}")]
    Export {
        /// Human-readable error message.
        message: String,
    },
}

impl ConvertError {
    /// Create a new format error.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a new field parse error.
    #[must_use]
    pub fn parse(line: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new JSON error with context.
    #[must_use]
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the spectator-log outcome rather than a real failure.
    #[must_use]
    pub const fn is_spectator_log(&self) -> bool {
        matches!(self, Self::SpectatorLog)
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } | Self::Json { .. } | Self::Csv { .. } => exit_codes::EXIT_PARSE_ERROR,
            Self::Format { .. } => exit_codes::EXIT_DATA_ERROR,
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::SpectatorLog => exit_codes::EXIT_SPECTATOR_LOG,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::Io { .. } => exit_codes::EXIT_IO_ERROR,
            Self::Export { .. } => exit_codes::EXIT_GENERAL_ERROR,
        }
    }
}

/// Result type alias for pokernow2hh operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        Self::Csv { source: err }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// A record could not be parsed.
    pub const EXIT_PARSE_ERROR: i32 = 2;
    /// Specified input file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// The log was captured by a spectator.
    pub const EXIT_SPECTATOR_LOG: i32 = 6;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let parse_err = ConvertError::parse(3, "amount", "not a number");
        assert_eq!(parse_err.exit_code(), 2);

        let not_found = ConvertError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        assert_eq!(ConvertError::SpectatorLog.exit_code(), 6);
        assert_eq!(ConvertError::format("bad header").exit_code(), 65);
    }

    #[test]
    fn test_spectator_message() {
        let err = ConvertError::SpectatorLog;
        assert!(err.is_spectator_log());
        assert_eq!(
            err.to_string(),
            "spectator log detected: no hero cards found in any hand"
        );
        assert!(!ConvertError::format("x").is_spectator_log());
    }

    #[test]
    fn test_parse_message_names_field() {
        let err = ConvertError::parse(12, "big blind amount", "invalid digit");
        assert_eq!(
            err.to_string(),
            "Failed to parse big blind amount at line 12: invalid digit"
        );
    }
}
