// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User session and the small reference caches kept alongside it.
//!
//! This is the subset of console state that survives a restart. Connectivity
//! and the offline queue are deliberately not part of it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Bearer credential attached to outbound requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Persisted session fields: user, role, and two reference caches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub role: Option<String>,
    /// Cached warehouse list used by pickers.
    #[serde(default)]
    pub warehouses: Vec<Value>,
    /// Cached location list used by pickers.
    #[serde(default)]
    pub locations: Vec<Value>,
}

impl Session {
    /// Returns the bearer token if a user with a non-empty token is signed in.
    pub fn bearer_token(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
