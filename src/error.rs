//! Error handling for the artbox client

use std::fmt;
use thiserror::Error;

/// Unified error type for the artbox client
#[derive(Error, Debug)]
pub enum Error {
    /// The remote store could not be reached or rejected the request.
    ///
    /// Callers on the persistence path treat this as a trigger for the
    /// in-memory fallback tier rather than a user-facing failure.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The backing table is not provisioned (first-run condition).
    ///
    /// Handled exactly like [`Error::RemoteUnavailable`] by the fallback
    /// logic; kept distinct so the condition shows up in diagnostics.
    #[error("remote schema missing ({code:?}): {message}")]
    SchemaMissing {
        /// PostgREST error code, e.g. `42P01` for a missing relation
        code: Option<String>,
        message: String,
    },

    /// Image generation failed; no partial result is available.
    #[error("image generation failed: {0}")]
    GenerationFailed(String),

    /// Input rejected before any I/O was attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new remote-unavailable error
    pub fn remote_unavailable<T: fmt::Display>(msg: T) -> Self {
        Error::RemoteUnavailable(msg.to_string())
    }

    /// Create a new schema-missing error
    pub fn schema_missing<T: fmt::Display>(code: Option<String>, msg: T) -> Self {
        Error::SchemaMissing {
            code,
            message: msg.to_string(),
        }
    }

    /// Create a new generation error
    pub fn generation<T: fmt::Display>(msg: T) -> Self {
        Error::GenerationFailed(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Whether this error should divert a persistence call to the next tier
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Error::RemoteUnavailable(_) | Error::SchemaMissing { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteUnavailable(err.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
