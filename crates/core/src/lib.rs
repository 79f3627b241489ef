// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wh-core: Shared data model for the wharf console network layer
//!
//! This crate provides the mutation descriptors, connectivity flag, session
//! state, and the offline queue together with their on-disk persistence. It
//! is synchronous; the async dispatch and replay machinery lives in wh-sync.

pub mod clock;
pub mod connectivity;
pub mod descriptor;
pub mod error;
pub mod jsonl;
pub mod persist;
pub mod queue;
pub mod session;

pub use clock::{ClockSource, SystemClock};
pub use connectivity::{ConnectivityState, Transition};
pub use descriptor::{Method, MutationDescriptor};
pub use error::{Error, Result};
pub use persist::{Namespace, StoreLock};
pub use queue::OfflineQueue;
pub use session::{Session, User};
