//! Document ingestion and citation-chunk endpoints.

use rag_core::entities::{
    AddUrl, Chunk, ConfirmUpload, ProjectDocument, UploadTarget, UploadUrlRequest,
};

use crate::{ApiClient, error::ApiError, http::segment};

impl ApiClient {
    /// `GET /api/projects/{id}/files`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn list_documents(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<ProjectDocument>, ApiError> {
        let path = format!("/api/projects/{}/files", segment(project_id));
        self.get(&path, token).await
    }

    /// `POST /api/projects/{id}/files/upload-url`: reserve a storage key and
    /// get a presigned PUT target for it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn request_upload_url(
        &self,
        project_id: &str,
        request: &UploadUrlRequest,
        token: Option<&str>,
    ) -> Result<UploadTarget, ApiError> {
        let path = format!("/api/projects/{}/files/upload-url", segment(project_id));
        self.post(&path, request, token).await
    }

    /// `POST /api/projects/{id}/files/confirm`: tell the backend the bytes for
    /// `s3_key` are in storage. Returns the document record, now queued for
    /// processing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn confirm_upload(
        &self,
        project_id: &str,
        s3_key: &str,
        token: Option<&str>,
    ) -> Result<ProjectDocument, ApiError> {
        let path = format!("/api/projects/{}/files/confirm", segment(project_id));
        let body = ConfirmUpload {
            s3_key: s3_key.to_string(),
        };
        self.post(&path, &body, token).await
    }

    /// `DELETE /api/projects/{id}/files/{document_id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_document(
        &self,
        project_id: &str,
        document_id: &str,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/api/projects/{}/files/{}",
            segment(project_id),
            segment(document_id)
        );
        self.delete(&path, token).await
    }

    /// `POST /api/projects/{id}/urls`: ingest a web page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn add_url(
        &self,
        project_id: &str,
        url: &str,
        token: Option<&str>,
    ) -> Result<ProjectDocument, ApiError> {
        let path = format!("/api/projects/{}/urls", segment(project_id));
        let body = AddUrl {
            url: url.to_string(),
        };
        self.post(&path, &body, token).await
    }

    /// `GET /api/projects/{id}/documents/{document_id}/chunks/{chunk_id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn get_chunk(
        &self,
        project_id: &str,
        document_id: &str,
        chunk_id: &str,
        token: Option<&str>,
    ) -> Result<Chunk, ApiError> {
        let path = format!(
            "/api/projects/{}/documents/{}/chunks/{}",
            segment(project_id),
            segment(document_id),
            segment(chunk_id)
        );
        self.get(&path, token).await
    }
}
