// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the network layer.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised while setting up or running the network layer.
///
/// Mutation failures have their own taxonomy, see [`DispatchError`](crate::DispatchError).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] wh_core::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// A specialized Result type for network layer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
