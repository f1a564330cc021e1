//! Response envelope shared by every backend endpoint.
//!
//! The backend never returns a bare payload: each success body has the shape
//! `{ "message": "...", "data": <payload> }`. Clients deserialize into
//! [`Envelope<T>`] and keep only `data`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Human-readable status line from the backend. Informational only.
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}
