// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for wh-core operations.

use thiserror::Error;

/// All possible errors that can occur in wh-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid method: '{0}'\n  hint: valid methods are: POST, PUT, PATCH, DELETE")]
    InvalidMethod(String),

    #[error("invalid target: '{0}'\n  hint: a target is a non-empty path or URL")]
    InvalidTarget(String),

    #[error("state store is locked by another process: {0}\n  hint: only one console may own a persistence namespace at a time")]
    StoreLocked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data in {path}: {reason}")]
    CorruptedData { path: String, reason: String },
}

/// A specialized Result type for wh-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
