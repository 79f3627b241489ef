// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for hosts embedding the network layer.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Events go to
/// `log_path` when it can be opened for append, else to stderr with a warning
/// saying why. Fails if a global subscriber is already installed.
pub fn init(log_path: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut open_error = None;
    let file = match log_path.map(|path| (path, open_log(path))) {
        Some((_, Ok(file))) => Some(file),
        Some((path, Err(e))) => {
            open_error = Some((path.to_path_buf(), e));
            None
        }
        None => None,
    };

    let installed = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|e| Error::Logging(e.to_string()))?;

    if let Some((path, e)) = open_error {
        tracing::warn!(path = %path.display(), error = %e, "cannot open log file, logging to stderr");
    }
    Ok(())
}

/// Opens `path` for append, creating its directory first.
fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
