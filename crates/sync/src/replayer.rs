// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization replayer.
//!
//! When connectivity returns, the replayer drains the offline queue through
//! the dispatcher:
//!
//! 1. Snapshot the queue
//! 2. Replay each descriptor in enqueue order, one at a time
//! 3. Keep going past failures (logged, not reported per item)
//! 4. Remove every snapshotted descriptor, whatever its outcome (or, with
//!    `retain_failed`, keep the failures at the head of the queue)
//! 5. Send one aggregate notification
//!
//! Only one pass runs at a time. A trigger that arrives mid-pass is coalesced
//! into at most one follow-up pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ReplayPolicy;
use crate::dispatcher::Dispatcher;
use crate::notify::{self, Notifier, Severity};
use crate::store::StateStore;
use crate::transport::{HttpTransport, Transport};

/// Outcome of one or more replay passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failed descriptors put back on the queue (`retain_failed` only).
    pub retained: usize,
}

impl ReplayReport {
    fn absorb(&mut self, other: ReplayReport) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.retained += other.retained;
    }
}

/// Result of asking the replayer to run.
#[derive(Debug)]
pub enum ReplayTrigger {
    /// A new pass was started on a background task.
    Started(JoinHandle<ReplayReport>),
    /// A pass was already running; a follow-up pass was requested instead.
    Coalesced,
    /// No tokio runtime to spawn on; the queue is left for a later trigger.
    NoRuntime,
}

impl ReplayTrigger {
    pub fn is_started(&self) -> bool {
        matches!(self, ReplayTrigger::Started(_))
    }
}

/// Replays the offline queue through the dispatcher.
pub struct Replayer<T: Transport = HttpTransport> {
    dispatcher: Arc<Dispatcher<T>>,
    store: StateStore,
    notifier: Arc<dyn Notifier>,
    policy: ReplayPolicy,
    running: AtomicBool,
    rerun: AtomicBool,
}

impl<T: Transport> Replayer<T> {
    pub fn new(
        dispatcher: Arc<Dispatcher<T>>,
        store: StateStore,
        notifier: Arc<dyn Notifier>,
        policy: ReplayPolicy,
    ) -> Self {
        Replayer {
            dispatcher,
            store,
            notifier,
            policy,
            running: AtomicBool::new(false),
            rerun: AtomicBool::new(false),
        }
    }

    /// Returns true while a pass is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> bool {
        self.running.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    fn coalesce(&self) {
        debug!("replay already running, coalescing trigger");
        self.rerun.store(true, Ordering::Release);
    }

    /// Runs replay on the current task.
    ///
    /// Returns `None` if another pass holds the guard; that pass will run
    /// once more when it finishes.
    pub async fn run(&self) -> Option<ReplayReport> {
        if !self.try_acquire() {
            self.coalesce();
            return None;
        }
        Some(self.run_acquired().await)
    }

    /// Runs passes while holding the guard, honouring one coalesced rerun at a time.
    async fn run_acquired(&self) -> ReplayReport {
        let mut total = ReplayReport::default();
        loop {
            total.absorb(self.pass().await);
            self.running.store(false, Ordering::Release);

            let again = self.rerun.swap(false, Ordering::AcqRel)
                && self.store.is_online()
                && self.store.queue_len() > 0;
            if !again || !self.try_acquire() {
                return total;
            }
            debug!("running coalesced replay pass");
        }
    }

    /// One replay pass over a snapshot of the queue.
    async fn pass(&self) -> ReplayReport {
        let snapshot = self.store.drain_all();
        let mut report = ReplayReport::default();
        if snapshot.is_empty() {
            return report;
        }

        info!(count = snapshot.len(), "replaying offline queue");
        let mut failed = Vec::new();

        for descriptor in &snapshot {
            report.attempted += 1;
            match self.dispatcher.replay(descriptor).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    warn!(
                        method = %descriptor.method(),
                        target = descriptor.target(),
                        error = %e,
                        "replay failed"
                    );
                    report.failed += 1;
                    if self.policy == ReplayPolicy::RetainFailed {
                        failed.push(descriptor.clone());
                    }
                }
            }
        }

        // Only the snapshot is replaced: anything queued during the pass stays
        // behind the retained failures.
        let retained = failed.len();
        match self.store.replace_prefix(snapshot.len(), failed) {
            Ok(()) => report.retained = retained,
            Err(e) => error!(error = %e, "failed to clear replayed descriptors"),
        }

        let severity = if report.failed == 0 { Severity::Success } else { Severity::Info };
        self.notifier.notify(severity, &notify::synced(report.attempted, report.failed));
        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            retained = report.retained,
            "replay pass complete"
        );

        report
    }
}

impl<T: Transport + 'static> Replayer<T> {
    /// Starts replay on a background task unless a pass is already running.
    pub fn trigger(self: &Arc<Self>) -> ReplayTrigger {
        let Ok(runtime) = Handle::try_current() else {
            warn!(queued = self.store.queue_len(), "no tokio runtime, replay not started");
            return ReplayTrigger::NoRuntime;
        };
        if !self.try_acquire() {
            self.coalesce();
            return ReplayTrigger::Coalesced;
        }
        let this = Arc::clone(self);
        ReplayTrigger::Started(runtime.spawn(async move { this.run_acquired().await }))
    }
}

#[cfg(test)]
#[path = "replayer_tests.rs"]
mod tests;
