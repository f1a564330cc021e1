//! Shared response handling for every endpoint.
//!
//! Centralizes the status check (any non-success → [`ApiError::Status`]) and
//! envelope decoding so endpoint modules stay focused on paths and payloads.

use rag_core::envelope::Envelope;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. The body of a failed response
/// is never read.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

/// Decode a `{ message, data }` envelope and return `data`.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice::<Envelope<T>>(body)
        .map(Envelope::into_data)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a bare JSON body.
pub fn decode_bare<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice::<T>(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Percent-encode one path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
