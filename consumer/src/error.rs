//! Error types for the catalog consumer.
//!
//! # Design
//! A missing resource is not an error: lookups return `Ok(None)` on 404.
//! What remains is the two ways a round trip can fail: the request never got
//! a response, or the response body did not hold the expected record.

use thiserror::Error;

/// Errors returned by `Consumer` lookups and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read
    /// (connection refused, DNS failure, malformed URL).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body was not JSON, lacked a field, or carried a value of
    /// the wrong shape (including a malformed `created_on` timestamp).
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

/// Errors raised while loading `ConsumerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is empty")]
    Empty(&'static str),
}
