// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry-aware dispatcher for outbound mutations.
//!
//! Every write the console makes goes through [`Dispatcher::dispatch`]:
//! - the signed-in user's bearer token is attached
//! - failures with no response are retried with linear backoff
//! - error responses are rejected at once, never retried
//! - a rejection that happens while offline also lands in the offline queue
//!
//! The dispatcher keeps no state between calls; retry bookkeeping lives in a
//! [`RetryContext`] scoped to one call.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};
use wh_core::{Method, MutationDescriptor};

use crate::notify::{self, Notifier, Severity};
use crate::retry::{RetryContext, RetryPolicy};
use crate::store::StateStore;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Why a mutation was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No response was received, even after retrying.
    #[error("network error after {attempts} attempt(s): {reason}")]
    Transient { attempts: u8, reason: String },

    /// The server answered with an error status.
    #[error("server rejected request with status {status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server { status: u16, message: Option<String> },

    /// The request could not be sent at all.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The rejection happened while offline and the mutation was queued.
    #[error("{source}\n  hint: the action was queued and will be sent when the connection returns")]
    Deferred { source: Box<DispatchError> },
}

impl DispatchError {
    /// The underlying failure, looking through [`DispatchError::Deferred`].
    pub fn cause(&self) -> &DispatchError {
        match self {
            DispatchError::Deferred { source } => source.cause(),
            other => other,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self.cause(), DispatchError::Transient { .. })
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, DispatchError::Deferred { .. })
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<u16> {
        match self.cause() {
            DispatchError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the operator for this rejection.
    pub fn user_message(&self) -> String {
        match self.cause() {
            DispatchError::Transient { .. } => notify::NETWORK_ERROR.to_string(),
            DispatchError::Server { message: Some(m), .. } => m.clone(),
            _ => notify::GENERIC_ERROR.to_string(),
        }
    }
}

/// Whether a rejection is reported and queued, or only returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// A fresh mutation from the UI.
    Live,
    /// A queued mutation being replayed; failures are left to the replayer.
    Replay,
}

/// Executes mutations with the retry and offline-queue policy.
pub struct Dispatcher<T: Transport = HttpTransport> {
    transport: T,
    store: StateStore,
    notifier: Arc<dyn Notifier>,
    policy: RetryPolicy,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(
        transport: T,
        store: StateStore,
        notifier: Arc<dyn Notifier>,
        policy: RetryPolicy,
    ) -> Self {
        Dispatcher { transport, store, notifier, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Sends a mutation on behalf of the UI.
    ///
    /// On rejection the operator is notified. If the store reports offline at
    /// that moment, the mutation is also appended to the offline queue and the
    /// error comes back wrapped in [`DispatchError::Deferred`].
    pub async fn dispatch(
        &self,
        method: Method,
        target: &str,
        payload: Value,
    ) -> Result<ApiResponse, DispatchError> {
        if target.trim().is_empty() {
            let err = DispatchError::InvalidRequest("empty target".to_string());
            self.notifier.notify(Severity::Error, &err.user_message());
            return Err(err);
        }
        let request = ApiRequest {
            method,
            target: target.to_string(),
            payload,
            bearer: self.store.bearer_token(),
        };
        self.execute(request, Mode::Live).await
    }

    /// Re-issues a queued descriptor.
    ///
    /// Retries like [`dispatch`](Self::dispatch) but never notifies per item
    /// and never re-queues a failure.
    pub async fn replay(
        &self,
        descriptor: &MutationDescriptor,
    ) -> Result<ApiResponse, DispatchError> {
        let request = ApiRequest {
            method: descriptor.method(),
            target: descriptor.target().to_string(),
            payload: descriptor.payload().clone(),
            bearer: self.store.bearer_token(),
        };
        self.execute(request, Mode::Replay).await
    }

    async fn execute(&self, request: ApiRequest, mode: Mode) -> Result<ApiResponse, DispatchError> {
        match self.send_with_retry(&request, RetryContext::first()).await {
            Ok(response) => Ok(response),
            Err(err) => Err(self.reject(request, err, mode)),
        }
    }

    /// Sends until success, a non-transient failure, or the retry budget runs out.
    async fn send_with_retry(
        &self,
        request: &ApiRequest,
        ctx: RetryContext,
    ) -> Result<ApiResponse, DispatchError> {
        let mut ctx = ctx;
        loop {
            debug!(
                method = %request.method,
                target = %request.target,
                attempt = ctx.sends(),
                "sending mutation"
            );

            let err = match self.transport.send(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    return Err(DispatchError::Server {
                        status: response.status,
                        message: response.server_message(),
                    })
                }
                Err(e) if !e.is_transient() => {
                    return Err(DispatchError::InvalidRequest(e.to_string()));
                }
                Err(e) => e,
            };

            let Some((next, delay)) = self.policy.backoff(ctx) else {
                return Err(DispatchError::Transient {
                    attempts: ctx.sends(),
                    reason: err.to_string(),
                });
            };

            warn!(
                method = %request.method,
                target = %request.target,
                attempt = ctx.sends(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            ctx = next;
        }
    }

    /// Applies the rejection side effects for live mutations.
    fn reject(&self, request: ApiRequest, err: DispatchError, mode: Mode) -> DispatchError {
        if mode == Mode::Replay {
            return err;
        }

        warn!(method = %request.method, target = %request.target, error = %err, "mutation rejected");
        self.notifier.notify(Severity::Error, &err.user_message());

        if self.store.is_online() {
            return err;
        }

        let queued = MutationDescriptor::new(
            request.method,
            request.target,
            request.payload,
            self.store.now(),
        )
        .map_err(crate::Error::from)
        .and_then(|descriptor| self.store.append(descriptor));

        match queued {
            Ok(()) => {
                info!(queued = self.store.queue_len(), "mutation deferred to offline queue");
                self.notifier.notify(Severity::Info, notify::QUEUED);
                DispatchError::Deferred { source: Box::new(err) }
            }
            Err(e) => {
                error!(error = %e, "failed to queue mutation");
                err
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
