//! Utility functions for common operations.
//!
//! This module provides shared utilities used across the crate:
//! - Normalization of names, seats, hand ids and cards
//! - Atomic file writes for output and configuration files

pub mod normalize;

pub use normalize::*;

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ConvertError, Result};

/// Atomically write content to a file.
///
/// Content goes to a temporary file in the target directory which is then
/// renamed over the target, so readers never observe a partial file. If any
/// step fails the original file (if it exists) remains unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use pokernow2hh::util::atomic_write;
///
/// atomic_write("hands.txt", b"PokerStars Hand #1").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => {
            return Err(ConvertError::io(
                format!("Cannot determine parent directory for: {}", path.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            ))
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConvertError::io(
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }

    // Same directory keeps the rename on one filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        ConvertError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        ConvertError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        ConvertError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        ConvertError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}
