//! Bridge error types

use thiserror::Error;

/// Errors that can occur while talking to the tutoring backend
///
/// None of these escape [`super::Bridge::send`]; they are logged and turned
/// into a notification plus an error entry in the chat log.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Connection refused, DNS failure, timeout, ...
    #[error("could not reach backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Server Error: {status} {reason}")]
    Status { status: u16, reason: String },

    /// Body was not a JSON document
    #[error("could not decode backend response: {0}")]
    Decode(#[source] reqwest::Error),
}
