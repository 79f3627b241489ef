// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wh-sync: Network resilience layer for the wharf console.
//!
//! Keeps operator actions flowing when the warehouse network is unreliable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │     UI      │────►│ Dispatcher  │────►│  Transport  │────► API
//! │             │◄────│  (retries)  │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                        │       ▲
//!         rejected while │       │ replay
//!                offline ▼       │
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Monitor   │────►│ StateStore  │◄────│  Replayer   │
//! │ (signals)   │     │   (queue)   │     │(single pass)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │ went online                          ▲
//!        └──────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - Linear backoff retries for requests that get no response
//! - Offline queue journaled as JSONL, replayed in order on reconnect
//! - Single-flight replay; triggers arriving mid-pass are coalesced
//! - Session persistence under a fixed namespace
//! - Injectable transport and notifier traits for testing

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod layer;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod replayer;
pub mod retry;
pub mod store;
pub mod transport;

pub use config::{ReplayPolicy, SyncConfig};
pub use dispatcher::{DispatchError, Dispatcher};
pub use error::{Error, Result};
pub use layer::NetworkLayer;
pub use monitor::{ConnectivityMonitor, ConnectivitySignal, SignalOutcome};
pub use notify::{Notifier, Severity, TracingNotifier};
pub use replayer::{ReplayReport, ReplayTrigger, Replayer};
pub use retry::{RetryContext, RetryPolicy};
pub use store::StateStore;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};

#[cfg(test)]
mod test_helpers;
