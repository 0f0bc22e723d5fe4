//! Error types shared across the client.

use thiserror::Error;

/// Failure of a single generation attempt.
///
/// Only [`GenerationError::Unauthorized`] mutates state (the session is
/// cleared before it is returned). Every other variant leaves the session
/// untouched and the controller ready for a manual retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Prompt was empty after trimming. No request was sent.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The service could not be reached.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service rejected the credential (HTTP 401).
    #[error("credential rejected by the generation service")]
    Unauthorized,

    /// The service reported a failure in its `error` field.
    #[error("service error: {0}")]
    ServiceError(String),

    /// The response did not match the generation contract.
    #[error("malformed generation result: {0}")]
    MalformedResult(String),
}

/// Transport-level failure: no response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Login / registration failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The service answered with an unexpected body.
    #[error("unexpected response from the service: {0}")]
    Malformed(String),
}

/// Durable session storage failure.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Clipboard access failure.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No clipboard helper program could be found.
    #[error("no clipboard helper available")]
    Unavailable,

    /// Spawning or feeding the helper failed.
    #[error("clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The helper exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed {
        /// Helper program name.
        program: &'static str,
        /// Exit status description.
        status: String,
    },
}
