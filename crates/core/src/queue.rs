// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline mutation queue.
//!
//! An ordered, append-only buffer of [`MutationDescriptor`]s recorded while the
//! console is offline. The queue is FIFO and unbounded. Reading it
//! ([`OfflineQueue::drain_all`]) never removes anything; removal is a separate,
//! explicit step so a replay pass can sequence "read, replay, clear"
//! deterministically.
//!
//! A queue may be journaled: each append is written as one fsynced JSONL line
//! and the journal is reloaded on open, so queued mutations survive a restart.

use std::path::{Path, PathBuf};

use crate::descriptor::MutationDescriptor;
use crate::error::Result;
use crate::jsonl;

/// Offline queue of deferred mutations.
#[derive(Debug, Default)]
pub struct OfflineQueue {
    entries: Vec<MutationDescriptor>,
    /// Path to the JSONL journal, if persisted.
    journal: Option<PathBuf>,
}

impl OfflineQueue {
    /// Creates an in-memory queue that is lost on restart.
    pub fn in_memory() -> Self {
        OfflineQueue::default()
    }

    /// Opens a journaled queue, loading any descriptors already on disk.
    ///
    /// A torn record left by an interrupted append is dropped and the journal
    /// rewritten without it, so later appends start on a clean line.
    pub fn open(path: &Path) -> Result<Self> {
        let loaded = jsonl::read_journal::<MutationDescriptor>(path)?;
        if loaded.torn_tail {
            jsonl::write_all(path, &loaded.records)?;
        }
        Ok(OfflineQueue { entries: loaded.records, journal: Some(path.to_path_buf()) })
    }

    /// Returns the journal path, if any.
    pub fn journal(&self) -> Option<&Path> {
        self.journal.as_deref()
    }

    /// Appends a descriptor at the tail.
    ///
    /// With a journal, the descriptor is on disk before this returns; on a
    /// write failure the in-memory queue is left unchanged.
    pub fn append(&mut self, descriptor: MutationDescriptor) -> Result<()> {
        if let Some(path) = &self.journal {
            jsonl::append(path, &descriptor)?;
        }
        self.entries.push(descriptor);
        Ok(())
    }

    /// Returns a snapshot of every queued descriptor in enqueue order.
    ///
    /// Does not remove anything.
    pub fn drain_all(&self) -> Vec<MutationDescriptor> {
        self.entries.clone()
    }

    /// Empties the queue unconditionally.
    pub fn clear(&mut self) -> Result<()> {
        if let Some(path) = &self.journal {
            jsonl::write_all::<MutationDescriptor>(path, &[])?;
        }
        self.entries.clear();
        Ok(())
    }

    /// Removes the first `count` descriptors.
    ///
    /// Removing at least as many as are queued is a [`clear`](Self::clear).
    pub fn remove_first(&mut self, count: usize) -> Result<()> {
        if count >= self.entries.len() {
            return self.clear();
        }
        if count == 0 {
            return Ok(());
        }

        let remaining = &self.entries[count..];
        if let Some(path) = &self.journal {
            jsonl::write_all(path, remaining)?;
        }
        self.entries.drain(..count);
        Ok(())
    }

    /// Replaces the first `count` descriptors with `retained`.
    ///
    /// `retained` takes the place of the removed prefix, ahead of anything
    /// appended after it, and the journal is rewritten once.
    pub fn replace_prefix(
        &mut self,
        count: usize,
        retained: Vec<MutationDescriptor>,
    ) -> Result<()> {
        if retained.is_empty() {
            return self.remove_first(count);
        }

        let count = count.min(self.entries.len());
        let mut next = retained;
        next.extend_from_slice(&self.entries[count..]);
        if let Some(path) = &self.journal {
            jsonl::write_all(path, &next)?;
        }
        self.entries = next;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
