//! Error types for the polling core.
//!
//! Adapter errors stay inside the owning poller: they update that source's
//! health metadata and are retried on the next tick, never surfaced to a
//! query response. Only [`UnknownSource`] crosses the HTTP boundary.

use thiserror::Error;

/// Errors that can occur when an adapter pulls from its upstream API.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Failed to parse/normalize the upstream response.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Authentication against the upstream failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The poll attempt exceeded its bound.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                AdapterError::Auth(err.to_string())
            } else {
                AdapterError::Status(status.as_u16())
            }
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

/// A client asked for a source id outside the configured set.
#[derive(Debug, Error)]
#[error("unknown source: {0}")]
pub struct UnknownSource(pub String);
