// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State store: the single owner of connectivity, the offline queue and the
//! session.
//!
//! Constructed once at startup and shared by cloning the handle. The
//! dispatcher, replayer and monitor only go through the operations below and
//! never keep private copies. Each field sits behind its own mutex; no lock is
//! ever held across an await point.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use wh_core::persist::{self, Namespace, StoreLock};
use wh_core::{
    ClockSource, ConnectivityState, MutationDescriptor, OfflineQueue, Session, SystemClock,
    Transition,
};

use crate::error::Result;

/// Shared state handle.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    connectivity: Mutex<ConnectivityState>,
    queue: Mutex<OfflineQueue>,
    session: Mutex<Session>,
    clock: Arc<dyn ClockSource>,
    /// Where the session is saved; `None` for in-memory stores.
    namespace: Option<Namespace>,
    _lock: Option<StoreLock>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl StateStore {
    /// Creates a store that keeps everything in memory.
    pub fn in_memory(online: bool) -> Self {
        Self::in_memory_with_clock(online, Arc::new(SystemClock))
    }

    /// Creates an in-memory store with a custom clock (for testing).
    pub fn in_memory_with_clock(online: bool, clock: Arc<dyn ClockSource>) -> Self {
        let now = clock.now();
        StateStore {
            inner: Arc::new(StoreInner {
                connectivity: Mutex::new(ConnectivityState::new(online, now)),
                queue: Mutex::new(OfflineQueue::in_memory()),
                session: Mutex::new(Session::default()),
                clock,
                namespace: None,
                _lock: None,
            }),
        }
    }

    /// Opens the persistent store for a namespace.
    ///
    /// Takes the namespace lock, loads the saved session and, when
    /// `persist_queue` is set, the queue journal. Connectivity is never
    /// persisted; it starts from the `online` flag the host observed.
    pub fn open(ns: Namespace, persist_queue: bool, online: bool) -> Result<Self> {
        let lock = StoreLock::acquire(&ns)?;
        let session = persist::load_session(&ns)?;
        let queue = if persist_queue {
            OfflineQueue::open(&ns.queue_path())?
        } else {
            OfflineQueue::in_memory()
        };
        let clock: Arc<dyn ClockSource> = Arc::new(SystemClock);
        let now = clock.now();

        tracing::debug!(
            dir = %ns.dir().display(),
            queued = queue.len(),
            persist_queue,
            "opened state store"
        );

        Ok(StateStore {
            inner: Arc::new(StoreInner {
                connectivity: Mutex::new(ConnectivityState::new(online, now)),
                queue: Mutex::new(queue),
                session: Mutex::new(session),
                clock,
                namespace: Some(ns),
                _lock: Some(lock),
            }),
        })
    }

    /// Current time from the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    pub fn is_online(&self) -> bool {
        lock(&self.inner.connectivity).is_online()
    }

    pub fn connectivity(&self) -> ConnectivityState {
        *lock(&self.inner.connectivity)
    }

    /// Sets the connectivity flag, returning the transition if it changed.
    pub fn set_online(&self, online: bool) -> Option<Transition> {
        let now = self.now();
        lock(&self.inner.connectivity).apply(online, now)
    }

    /// Appends a descriptor to the offline queue.
    pub fn append(&self, descriptor: MutationDescriptor) -> Result<()> {
        lock(&self.inner.queue).append(descriptor)?;
        Ok(())
    }

    /// Snapshot of the offline queue in enqueue order. Removes nothing.
    pub fn drain_all(&self) -> Vec<MutationDescriptor> {
        lock(&self.inner.queue).drain_all()
    }

    /// Empties the offline queue unconditionally.
    pub fn clear(&self) -> Result<()> {
        lock(&self.inner.queue).clear()?;
        Ok(())
    }

    /// Swaps the oldest `count` descriptors for `retained`, keeping the
    /// retained ones ahead of anything queued since.
    pub fn replace_prefix(&self, count: usize, retained: Vec<MutationDescriptor>) -> Result<()> {
        lock(&self.inner.queue).replace_prefix(count, retained)?;
        Ok(())
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.inner.queue).len()
    }

    pub fn session(&self) -> Session {
        lock(&self.inner.session).clone()
    }

    /// Bearer token of the signed-in user, if any.
    pub fn bearer_token(&self) -> Option<String> {
        lock(&self.inner.session).bearer_token().map(str::to_string)
    }

    /// Replaces the session and saves it when the store is persistent.
    pub fn set_session(&self, session: Session) -> Result<()> {
        self.update_session(|s| *s = session)
    }

    /// Mutates the session in place and saves it when the store is persistent.
    pub fn update_session(&self, f: impl FnOnce(&mut Session)) -> Result<()> {
        let mut session = lock(&self.inner.session);
        f(&mut *session);
        if let Some(ns) = &self.inner.namespace {
            persist::save_session(ns, &session)?;
        }
        Ok(())
    }

    /// Drops the signed-in user and role, keeping the reference caches.
    pub fn sign_out(&self) -> Result<()> {
        self.update_session(|s| {
            s.user = None;
            s.role = None;
        })
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("online", &self.is_online())
            .field("queued", &self.queue_len())
            .field("persistent", &self.inner.namespace.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
