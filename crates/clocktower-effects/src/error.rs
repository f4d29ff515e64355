//! Error types for effect dispatch.

use thiserror::Error;

use crate::batch::BatchFailure;

/// Errors that can occur while triggering an effect.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The effect name is not part of the vocabulary.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// The dispatcher was handed an effect it does not implement.
    #[error("{dispatcher} does not support effect '{effect}'")]
    Unsupported { dispatcher: String, effect: String },

    /// The parameter map did not match what the effect needs.
    #[error("invalid parameters for '{effect}': {reason}")]
    InvalidParams { effect: String, reason: String },

    /// The remote service answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The HTTP request itself failed (connect, timeout, body).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A base URL or path could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Some commands of a batch failed. Siblings were not cancelled.
    #[error("{} batch command(s) failed", .0.len())]
    BatchPartialFailure(Vec<BatchFailure>),

    /// A batch unit of work panicked or was aborted.
    #[error("batch task failed: {0}")]
    Join(String),

    /// I/O error (e.g. creating the async runtime).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for effect operations.
pub type Result<T> = std::result::Result<T, EffectError>;
