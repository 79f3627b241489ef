// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout for one persistence namespace.
//!
//! A namespace `ns` under a state directory owns three files:
//!
//! ```text
//! <state_dir>/ns.json          session (user, role, reference caches)
//! <state_dir>/ns.queue.jsonl   offline queue journal (optional)
//! <state_dir>/ns.lock          single-writer lock
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::session::Session;

/// Paths for a persistence namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    dir: PathBuf,
    name: String,
}

impl Namespace {
    pub fn new(dir: &Path, name: &str) -> Self {
        Namespace { dir: dir.to_path_buf(), name: name.to_string() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }

    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(format!("{}.queue.jsonl", self.name))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", self.name))
    }
}

/// Exclusive advisory lock held for as long as the value lives.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Acquires the namespace lock, creating the state directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreLocked`] if another process holds the lock.
    pub fn acquire(ns: &Namespace) -> Result<Self> {
        fs::create_dir_all(ns.dir())?;
        let path = ns.lock_path();
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| Error::StoreLocked(path.display().to_string()))?;
        Ok(StoreLock { _file: file })
    }
}

/// Loads the persisted session, or an empty one if none was saved.
pub fn load_session(ns: &Namespace) -> Result<Session> {
    let path = ns.session_path();
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::default()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Session::default());
    }
    serde_json::from_str(&content).map_err(|e| Error::CorruptedData {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Saves the session, replacing the previous file atomically.
pub fn save_session(ns: &Namespace, session: &Session) -> Result<()> {
    fs::create_dir_all(ns.dir())?;
    let path = ns.session_path();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(session)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
