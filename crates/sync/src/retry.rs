// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Linear backoff for transient failures.
//!
//! A [`RetryContext`] is created fresh for every logical request and threaded
//! by value through the retry loop; it is never stored or shared.

use std::time::Duration;

/// How many retries a single logical request has used so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryContext {
    attempt: u8,
}

impl RetryContext {
    /// Context for the first attempt of a new request.
    pub fn first() -> Self {
        RetryContext { attempt: 0 }
    }

    /// Number of retries already performed.
    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    /// Total sends made once the current attempt completes.
    pub fn sends(&self) -> u8 {
        self.attempt.saturating_add(1)
    }

    fn next(self) -> Self {
        RetryContext { attempt: self.attempt.saturating_add(1) }
    }
}

/// Retry budget and backoff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u8,
    step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_retries: 3, step: Duration::from_millis(1000) }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u8, step: Duration) -> Self {
        RetryPolicy { max_retries, step }
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Decides whether a transient failure under `ctx` gets another try.
    ///
    /// Returns the context for the retry and how long to wait first
    /// (`retry_number * step`), or `None` once the budget is spent.
    pub fn backoff(&self, ctx: RetryContext) -> Option<(RetryContext, Duration)> {
        if ctx.attempt >= self.max_retries {
            return None;
        }
        let next = ctx.next();
        Some((next, self.step * u32::from(next.attempt)))
    }

    /// Sum of all backoff delays for a request that never succeeds.
    pub fn worst_case_delay(&self) -> Duration {
        (1..=u32::from(self.max_retries)).map(|n| self.step * n).sum()
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
