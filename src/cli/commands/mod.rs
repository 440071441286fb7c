//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod config;
pub mod convert;
pub mod inspect;

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::model::PlayerCountFilter;

/// Read the whole input from `path`, or from stdin when it is piped.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConvertError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            std::fs::read(path).map_err(|e| {
                ConvertError::io(format!("Failed to read input file: {}", path.display()), e)
            })
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(ConvertError::invalid_argument(
                    "input",
                    "no input file given and nothing piped to stdin",
                ));
            }
            let mut data = Vec::new();
            stdin
                .lock()
                .read_to_end(&mut data)
                .map_err(|e| ConvertError::io("Failed to read stdin", e))?;
            Ok(data)
        }
    }
}

/// Combine the `--filter-*` flags. No flag set means `fallback`.
pub fn filter_from_flags(
    heads_up: bool,
    spin_and_go: bool,
    mtt: bool,
    fallback: PlayerCountFilter,
) -> PlayerCountFilter {
    let mut filter = PlayerCountFilter::ALL;
    if heads_up {
        filter |= PlayerCountFilter::HEADS_UP;
    }
    if spin_and_go {
        filter |= PlayerCountFilter::SPIN_AND_GO;
    }
    if mtt {
        filter |= PlayerCountFilter::MTT;
    }
    if filter.is_all() {
        fallback
    } else {
        filter
    }
}
