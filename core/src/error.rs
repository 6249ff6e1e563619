//! Error types for the covid19api client.
//!
//! # Design
//! Every failure comes back to the caller as an `ApiError`; nothing is
//! swallowed or handed back in place of a payload. The three upstream
//! failure kinds are kept apart: the request never completed (`Transport`),
//! the body was not JSON (`Decode`), or the JSON did not have the shape the
//! accessor needs (`Schema`). `NotFound` gets its own variant because an
//! unknown country code is the most common caller mistake.

use thiserror::Error;

/// Errors returned by `TouristClient` and its transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round-trip failed before a response was read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The JSON decoded but lacks a field or nesting the accessor expects.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Wrap any transport-layer failure for `url`.
    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ApiError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
