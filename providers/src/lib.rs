//! Network layer for Rise flows.
//!
//! # Architecture
//!
//! - [`MutationService`] - the seam a flow submits through. Given a
//!   [`MutationRequest`] (`{method, path, payload}`) it returns a boxed future
//!   resolving to the JSON response or a [`MutationError`].
//! - [`ApiClient`] - the reqwest-backed implementation talking to the Rise
//!   API, plus the read-only calls the home screen needs.
//!
//! # Error Handling
//!
//! Every failure is folded into [`MutationError`], whose `Display` output is
//! the message shown to the user. There are no automatic retries here; a
//! retry is always a fresh, user-initiated submission.

mod client;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

pub use client::{ApiClient, ApiConfig, ApiConfigError};
pub use rise_types;

/// Mutation future type alias.
pub type MutationFut = Pin<Box<dyn Future<Output = Result<Value, MutationError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMethod {
    /// Payload is sent as query parameters.
    Get,
    /// Payload is sent as a JSON body.
    Post,
}

impl MutationMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub method: MutationMethod,
    pub path: String,
    pub payload: Value,
}

impl MutationRequest {
    #[must_use]
    pub fn get(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: MutationMethod::Get,
            path: path.into(),
            payload,
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: MutationMethod::Post,
            path: path.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// Transport-level failure (connection refused, timeout, ...).
    #[error("{0}")]
    Network(String),
    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Performs one network mutation per call.
pub trait MutationService: Send + Sync {
    fn mutate(&self, request: MutationRequest) -> MutationFut;
}

/// Pull a human-readable message out of an API error body.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body.trim()).ok()?;
    payload
        .pointer("/message")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| payload.pointer("/error").and_then(Value::as_str))
        .or_else(|| payload.pointer("/errors/0/message").and_then(Value::as_str))
        .or_else(|| payload.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}
