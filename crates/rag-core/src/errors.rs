//! Cross-cutting error types for Ragdesk.
//!
//! Transport errors live in `rag-client` (`ApiError`) and controller
//! precondition errors in `rag-session` (`SessionError`). This module only
//! holds failures that can be raised while constructing or validating domain
//! values.

use thiserror::Error;

/// Errors raised by domain-level validation and parsing.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A settings key was not one of the recognised fields.
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    /// A value could not be parsed into the type its field requires.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// An enum string did not match any known variant.
    #[error("invalid {kind}: {value}")]
    InvalidEnum { kind: &'static str, value: String },
}
