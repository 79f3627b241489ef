// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON Lines helpers for the queue journal.
//!
//! Each record is stored as a single JSON line and fsynced on write.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Appends a record to a JSONL file with fsync for durability.
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let json = serde_json::to_string(record)?;
    writeln!(file, "{json}")?;
    file.sync_all()?;

    Ok(())
}

/// Records read from a journal, plus whether a torn final line was dropped.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub torn_tail: bool,
}

/// Reads all records from a JSONL file.
///
/// Skips blank lines and returns an empty vec if the file doesn't exist.
/// A final line that fails to parse is the remains of an interrupted append:
/// it is dropped with a warning. A bad line anywhere else is corruption.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_journal(path).map(|loaded| loaded.records)
}

/// Like [`read_all`], but reports whether a torn final line was dropped.
pub fn read_journal<T: DeserializeOwned>(path: &Path) -> Result<Loaded<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Loaded { records: Vec::new(), torn_tail: false })
        }
        Err(e) => return Err(e.into()),
    };

    let mut lines = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((index + 1, line));
        }
    }

    let last = lines.len().saturating_sub(1);
    let mut loaded = Loaded { records: Vec::with_capacity(lines.len()), torn_tail: false };
    for (position, (number, line)) in lines.iter().enumerate() {
        match serde_json::from_str(line) {
            Ok(record) => loaded.records.push(record),
            Err(e) if position == last => {
                tracing::warn!(
                    path = %path.display(),
                    line = number,
                    error = %e,
                    "dropping torn record at end of journal"
                );
                loaded.torn_tail = true;
            }
            Err(e) => {
                return Err(Error::CorruptedData {
                    path: path.display().to_string(),
                    reason: format!("line {number}: {e}"),
                })
            }
        }
    }

    Ok(loaded)
}

/// Writes all records to a JSONL file, replacing existing content.
///
/// The records go to a sibling temp file that is fsynced and then renamed
/// over `path`, so a crash leaves either the old or the new content.
pub fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp = path.with_extension("jsonl.tmp");
    {
        let mut file = File::create(&tmp)?;
        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(file, "{json}")?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    Ok(())
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
