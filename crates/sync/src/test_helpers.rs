// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the network layer tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tokio::time::Instant;
use wh_core::{Method, MutationDescriptor, Session, User};

use crate::notify::{Notifier, Severity};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError, TransportResult};

type Outcome = TransportResult<ApiResponse>;

/// Mock transport for testing without real sockets.
///
/// Replies with scripted outcomes in order, then with the fallback outcome.
/// Cloning shares the script and the request log.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    script: VecDeque<Outcome>,
    fallback: Outcome,
    latency: Duration,
    sent: Vec<(Instant, ApiRequest)>,
}

impl MockTransport {
    /// A transport that answers 200 `{}` to everything.
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                fallback: Ok(ok()),
                latency: Duration::ZERO,
                sent: Vec::new(),
            })),
        }
    }

    /// A transport that never gets a response.
    pub fn unreachable() -> Self {
        let transport = MockTransport::new();
        transport.set_fallback(Err(timeout()));
        transport
    }

    /// Queues an outcome for the next unscripted send.
    pub fn push(&self, outcome: Outcome) {
        self.state.lock().unwrap().script.push_back(outcome);
    }

    pub fn set_fallback(&self, outcome: Outcome) {
        self.state.lock().unwrap().fallback = outcome;
    }

    /// Makes every send take this long (on tokio time).
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().unwrap().latency = latency;
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().sent.iter().map(|(_, r)| r.clone()).collect()
    }

    /// When each request was sent.
    pub fn send_times(&self) -> Vec<Instant> {
        self.state.lock().unwrap().sent.iter().map(|(t, _)| *t).collect()
    }

    pub fn send_count(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }
}

impl Transport for MockTransport {
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + 'a>> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let latency = {
                let mut s = state.lock().unwrap();
                s.sent.push((Instant::now(), request.clone()));
                s.latency
            };
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let mut s = state.lock().unwrap();
            let fallback = s.fallback.clone();
            s.script.pop_front().unwrap_or(fallback)
        })
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingNotifier::default())
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Messages with the given severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages.lock().unwrap().push((severity, message.to_string()));
    }
}

pub fn ok() -> ApiResponse {
    ApiResponse::new(200, json!({}))
}

pub fn status(code: u16, body: Value) -> ApiResponse {
    ApiResponse::new(code, body)
}

pub fn timeout() -> TransportError {
    TransportError::Timeout("operation timed out".to_string())
}

pub fn refused() -> TransportError {
    TransportError::Connect("connection refused".to_string())
}

/// A descriptor with a small payload naming its target.
pub fn descriptor(method: Method, target: &str) -> MutationDescriptor {
    MutationDescriptor::new(
        method,
        target,
        json!({"target": target}),
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
    )
    .unwrap()
}

pub fn signed_in_session(token: &str) -> Session {
    Session {
        user: Some(User { id: "u-42".into(), name: "Gate Clerk".into(), token: Some(token.into()) }),
        role: Some("clerk".into()),
        ..Session::default()
    }
}
