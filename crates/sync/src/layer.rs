// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The assembled network layer.
//!
//! Builds the store, dispatcher, replayer and monitor once and hands out
//! shared handles to them.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;
use wh_core::Method;

use crate::config::SyncConfig;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::error::Result;
use crate::monitor::{ConnectivityMonitor, ConnectivitySignal, SignalOutcome};
use crate::notify::Notifier;
use crate::replayer::{ReplayReport, Replayer};
use crate::store::StateStore;
use crate::transport::{ApiResponse, HttpTransport, Transport};

/// Network layer wired around one state store.
pub struct NetworkLayer<T: Transport = HttpTransport> {
    store: StateStore,
    dispatcher: Arc<Dispatcher<T>>,
    replayer: Arc<Replayer<T>>,
    monitor: Arc<ConnectivityMonitor<T>>,
}

impl NetworkLayer<HttpTransport> {
    /// Opens the persistent store under the configured state directory and
    /// talks HTTP to the configured API.
    ///
    /// `online` is the connectivity the host observes at startup.
    pub fn open(config: &SyncConfig, notifier: Arc<dyn Notifier>, online: bool) -> Result<Self> {
        config.validate()?;
        let store = StateStore::open(config.persistence(), config.persist_queue, online)?;
        let transport = HttpTransport::new(config)?;
        info!(
            base_url = %config.base_url,
            queued = store.queue_len(),
            online,
            "network layer ready"
        );
        Ok(NetworkLayer::new(config, store, transport, notifier))
    }
}

impl<T: Transport + 'static> NetworkLayer<T> {
    pub fn new(
        config: &SyncConfig,
        store: StateStore,
        transport: T,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            transport,
            store.clone(),
            Arc::clone(&notifier),
            config.retry_policy(),
        ));
        let replayer = Arc::new(Replayer::new(
            Arc::clone(&dispatcher),
            store.clone(),
            Arc::clone(&notifier),
            config.replay_policy,
        ));
        let monitor =
            Arc::new(ConnectivityMonitor::new(store.clone(), notifier, Arc::clone(&replayer)));
        NetworkLayer { store, dispatcher, replayer, monitor }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher<T>> {
        &self.dispatcher
    }

    pub fn replayer(&self) -> &Arc<Replayer<T>> {
        &self.replayer
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor<T>> {
        &self.monitor
    }

    /// Sends a mutation through the dispatcher.
    pub async fn dispatch(
        &self,
        method: Method,
        target: &str,
        payload: Value,
    ) -> std::result::Result<ApiResponse, DispatchError> {
        self.dispatcher.dispatch(method, target, payload).await
    }

    /// Feeds one connectivity signal to the monitor.
    ///
    /// Safe to call outside a tokio runtime; see [`ConnectivityMonitor::handle`].
    pub fn signal(&self, signal: ConnectivitySignal) -> SignalOutcome {
        self.monitor.handle(signal)
    }

    /// Replays the queue on the current task, unless a pass is already running.
    pub async fn replay_now(&self) -> Option<ReplayReport> {
        self.replayer.run().await
    }

    /// Runs the monitor on a background task fed by `signals`.
    pub fn spawn_monitor(&self, signals: mpsc::Receiver<ConnectivitySignal>) -> JoinHandle<()> {
        let monitor = Arc::clone(&self.monitor);
        tokio::spawn(async move { monitor.run(signals).await })
    }
}
