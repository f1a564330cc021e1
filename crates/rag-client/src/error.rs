//! API client error types.

use thiserror::Error;

/// Errors that can occur when talking to the backend or object storage.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, ...
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. Client and server
    /// errors are not distinguished and the response body is discarded.
    #[error("API Error:{status}")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A success response whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Status code for [`ApiError::Status`], `None` for other variants.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Http(_) | Self::Decode(_) => None,
        }
    }
}
