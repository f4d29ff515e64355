//! Error types for model parsing.

use thiserror::Error;

/// Errors from parsing model values out of text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown edition: {0}")]
    UnknownEdition(String),
}
