use serde::{Deserialize, Serialize};

/// Body of `GET /health`. Returned bare, without the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
