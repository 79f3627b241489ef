// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification channel to the operator.
//!
//! The network layer decides when to tell the user something; how it is shown
//! (toast, status bar, log line) is up to the host. Notifications are
//! fire-and-forget: no return value and no retry.

use std::fmt;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        })
    }
}

/// Sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Notifier that renders messages as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::warn!(%severity, "{message}"),
            Severity::Success | Severity::Info => tracing::info!(%severity, "{message}"),
        }
    }
}

/// Shown when a request exhausted its retries without any response.
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
/// Shown when the server rejected a request without explaining why.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";
/// Shown when a rejected mutation was saved to the offline queue.
pub const QUEUED: &str = "You are offline. The action was saved and will be sent when the connection returns.";
pub const WENT_OFFLINE: &str = "Connection lost. Changes will be queued until you are back online.";
pub const WENT_ONLINE: &str = "Back online.";

/// Aggregate message for a finished replay pass.
pub fn synced(attempted: usize, failed: usize) -> String {
    let plural = if attempted == 1 { "" } else { "s" };
    if failed == 0 {
        format!("Synced {attempted} offline action{plural}.")
    } else {
        format!("Synced {attempted} offline action{plural}, {failed} failed.")
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
