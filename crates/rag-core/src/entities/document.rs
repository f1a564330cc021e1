use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ProcessingStatus;

/// A document ingested into a project (uploaded file or web URL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectDocument {
    pub id: String,
    pub project_id: String,
    pub filename: String,
    /// Object-storage key. Empty for URL sources.
    #[serde(default)]
    pub s3_key: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_type: String,
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub source_url: Option<String>,
    /// `"url"` for web sources; absent for uploaded files.
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProjectDocument {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.processing_status.is_terminal()
    }

    #[must_use]
    pub fn is_url_source(&self) -> bool {
        self.source_type.as_deref() == Some("url")
    }
}

/// Body of `POST /api/projects/{id}/files/upload-url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadUrlRequest {
    pub filename: String,
    pub file_size: u64,
    pub file_type: String,
}

/// Presigned upload target returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadTarget {
    pub upload_url: String,
    pub s3_key: String,
    /// Placeholder record the backend creates in `uploading` state.
    #[serde(default)]
    pub document: Option<ProjectDocument>,
}

/// Body of `POST /api/projects/{id}/files/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmUpload {
    pub s3_key: String,
}

/// Body of `POST /api/projects/{id}/urls`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddUrl {
    pub url: String,
}
