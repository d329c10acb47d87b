//! Error types for Inkling.
//!
//! Library crates use [`InklingError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics; anything
//! shown to an end user goes through the short display strings below, never
//! a backtrace.

use std::path::PathBuf;

/// Top-level error type for all Inkling operations.
#[derive(Debug, thiserror::Error)]
pub enum InklingError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP transport error talking to an upstream service.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response from the content store API.
    #[error("content store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body parsing error (schema mismatch, missing field, etc.).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Completion service error (request, API, or response shape).
    #[error("completion error: {0}")]
    Completion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InklingError>;

impl InklingError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create an API error from a status code and message.
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
