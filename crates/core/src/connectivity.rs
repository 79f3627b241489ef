// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity flag and its transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A change of the connectivity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    WentOnline,
    WentOffline,
}

/// The authoritative online/offline flag plus when it last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    online: bool,
    changed_at: DateTime<Utc>,
}

impl ConnectivityState {
    /// Creates a state with the initial flag observed at startup.
    pub fn new(online: bool, at: DateTime<Utc>) -> Self {
        ConnectivityState { online, changed_at: at }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Time of the last transition (or of construction if none happened yet).
    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Applies a platform signal.
    ///
    /// Returns the transition if the flag changed; a repeated signal
    /// (online while already online) leaves the state untouched.
    pub fn apply(&mut self, online: bool, at: DateTime<Utc>) -> Option<Transition> {
        if self.online == online {
            return None;
        }
        self.online = online;
        self.changed_at = at;
        Some(if online { Transition::WentOnline } else { Transition::WentOffline })
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
