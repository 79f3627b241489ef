// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network layer configuration.
//!
//! Configuration is read from a TOML file and includes:
//! - `base_url`: the warehouse API root (overridable with `WHARF_API_URL`)
//! - retry and timeout knobs for the dispatcher
//! - where and whether console state is persisted

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wh_core::Namespace;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Environment variable that overrides `base_url`.
pub const API_URL_ENV: &str = "WHARF_API_URL";

/// What a replay pass does with descriptors whose replay failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Every replayed descriptor is dropped, success or not.
    #[default]
    FireAndForget,
    /// Failed descriptors go back on the queue for the next pass.
    RetainFailed,
}

/// Network layer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root URL that request targets are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Retries after the first attempt for transient failures (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,
    /// Linear backoff step in milliseconds: retry n waits n * step (default: 1000).
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
    /// Per-attempt request timeout in seconds (default: 15).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Directory for persisted state; defaults to the XDG state dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    /// Persistence namespace, the key all persisted files are named after.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Journal the offline queue so it survives a restart (default: true).
    #[serde(default = "default_persist_queue")]
    pub persist_queue: bool,
    #[serde(default)]
    pub replay_policy: ReplayPolicy,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_max_retries() -> u8 {
    3
}

fn default_backoff_step_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_namespace() -> String {
    "wharf-console".to_string()
}

fn default_persist_queue() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            backoff_step_ms: default_backoff_step_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            state_dir: None,
            namespace: default_namespace(),
            persist_queue: default_persist_queue(),
            replay_policy: ReplayPolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a TOML file, then applies env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: SyncConfig = toml::from_str(&content)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from defaults plus env overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = SyncConfig::default();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides using the given variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url '{url}' must start with http:// or https://"
            )));
        }
        if self.backoff_step_ms == 0 {
            return Err(Error::Config("backoff_step_ms must be greater than 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(Error::Config("connect_timeout_secs must be greater than 0".to_string()));
        }
        if self.namespace.trim().is_empty() || self.namespace.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "namespace '{}' must be a non-empty file name",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Returns the state directory, falling back to `$XDG_STATE_HOME/wharf`.
    pub fn state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        dirs::state_dir()
            .map(|d| d.join("wharf"))
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/state/wharf")))
            .unwrap_or_else(|| PathBuf::from(".local/state/wharf"))
    }

    pub fn persistence(&self) -> Namespace {
        Namespace::new(&self.state_dir(), &self.namespace)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.backoff_step_ms))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
