//! Error types for option parsing and bulk dispatch.

use thiserror::Error;

/// Failures while sending a bulk action or reading its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The request body could not be encoded.
    #[error("failed to encode bulk request: {0}")]
    Encode(String),
    /// The request never produced a response (network, CORS, aborted).
    #[error("bulk request failed: {0}")]
    Transport(String),
    /// The response body was not the expected JSON document.
    #[error("invalid bulk response: {0}")]
    Decode(String),
}

/// Failures while reading scope options supplied by page scripts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// Options object did not match the expected shape.
    #[error("invalid table options: {reason}")]
    Decode {
        /// Decoder message describing the mismatch.
        reason: String,
    },
    /// No table selector was supplied.
    #[error("table selector is required")]
    MissingTableSelector,
}
