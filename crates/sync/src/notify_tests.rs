// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    one = { 1, 0, "Synced 1 offline action." },
    two = { 2, 0, "Synced 2 offline actions." },
    with_failure = { 2, 1, "Synced 2 offline actions, 1 failed." },
)]
fn synced_message(attempted: usize, failed: usize, expected: &str) {
    assert_eq!(synced(attempted, failed), expected);
}

#[test]
fn severity_display() {
    assert_eq!(Severity::Success.to_string(), "success");
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Info.to_string(), "info");
}

#[test]
fn tracing_notifier_accepts_all_severities() {
    let notifier = TracingNotifier;
    notifier.notify(Severity::Info, WENT_OFFLINE);
    notifier.notify(Severity::Error, NETWORK_ERROR);
    notifier.notify(Severity::Success, WENT_ONLINE);
}
