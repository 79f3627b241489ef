// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation descriptors: the serializable form of a deferred write.
//!
//! A descriptor captures exactly what is needed to re-issue a mutation later:
//! the HTTP verb, the target resource, the JSON body, and when it was queued.
//! Descriptors carry no identity key, so two descriptors with identical fields
//! are distinct queue entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The write verbs the console issues against the warehouse API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the canonical uppercase verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// One pending write operation, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationDescriptor {
    method: Method,
    target: String,
    payload: Value,
    enqueued_at: DateTime<Utc>,
}

impl MutationDescriptor {
    /// Creates a descriptor stamped with the given time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if the target is empty or whitespace.
    pub fn new(
        method: Method,
        target: impl Into<String>,
        payload: Value,
        enqueued_at: DateTime<Utc>,
    ) -> Result<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(Error::InvalidTarget(target));
        }
        Ok(MutationDescriptor { method, target, payload, enqueued_at })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }
}

impl fmt::Display for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
