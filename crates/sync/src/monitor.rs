// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Relays the host's online/offline signals into the state store. The monitor
//! never polls: it only reacts to the signals it is handed. A signal that
//! does not change the flag is ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};
use wh_core::Transition;

use crate::notify::{self, Notifier, Severity};
use crate::replayer::{ReplayTrigger, Replayer};
use crate::store::StateStore;
use crate::transport::{HttpTransport, Transport};

/// A platform connectivity notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    Online,
    Offline,
}

impl ConnectivitySignal {
    fn is_online(self) -> bool {
        self == ConnectivitySignal::Online
    }
}

/// What handling one signal did.
#[derive(Debug)]
pub enum SignalOutcome {
    /// The flag already had this value.
    Unchanged,
    WentOffline,
    /// Went online and asked the replayer to drain the queue.
    WentOnline(ReplayTrigger),
}

/// Translates connectivity signals into state changes and replay passes.
pub struct ConnectivityMonitor<T: Transport = HttpTransport> {
    store: StateStore,
    notifier: Arc<dyn Notifier>,
    replayer: Arc<Replayer<T>>,
}

impl<T: Transport + 'static> ConnectivityMonitor<T> {
    pub fn new(store: StateStore, notifier: Arc<dyn Notifier>, replayer: Arc<Replayer<T>>) -> Self {
        ConnectivityMonitor { store, notifier, replayer }
    }

    /// Applies one signal.
    ///
    /// Going online triggers the replayer exactly once for that transition.
    /// Outside a tokio runtime the flag still changes but the replay comes back
    /// as [`ReplayTrigger::NoRuntime`].
    pub fn handle(&self, signal: ConnectivitySignal) -> SignalOutcome {
        match self.store.set_online(signal.is_online()) {
            None => {
                debug!(?signal, "connectivity unchanged");
                SignalOutcome::Unchanged
            }
            Some(Transition::WentOffline) => {
                info!("connectivity lost");
                self.notifier.notify(Severity::Info, notify::WENT_OFFLINE);
                SignalOutcome::WentOffline
            }
            Some(Transition::WentOnline) => {
                info!(queued = self.store.queue_len(), "connectivity restored");
                self.notifier.notify(Severity::Info, notify::WENT_ONLINE);
                SignalOutcome::WentOnline(self.replayer.trigger())
            }
        }
    }

    /// Consumes signals until every sender is dropped.
    pub async fn run(&self, mut signals: mpsc::Receiver<ConnectivitySignal>) {
        while let Some(signal) = signals.recv().await {
            self.handle(signal);
        }
        debug!("connectivity signal channel closed");
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
