//! Project and project-settings endpoints.

use rag_core::entities::{NewProject, Project};
use rag_core::settings::ProjectSettings;

use crate::{ApiClient, error::ApiError, http::segment};

impl ApiClient {
    /// `GET /api/projects`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn list_projects(&self, token: Option<&str>) -> Result<Vec<Project>, ApiError> {
        self.get("/api/projects", token).await
    }

    /// `POST /api/projects`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn create_project(
        &self,
        project: &NewProject,
        token: Option<&str>,
    ) -> Result<Project, ApiError> {
        self.post("/api/projects", project, token).await
    }

    /// `DELETE /api/projects/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_project(&self, project_id: &str, token: Option<&str>) -> Result<(), ApiError> {
        let path = format!("/api/projects/{}", segment(project_id));
        self.delete(&path, token).await
    }

    /// `GET /api/projects/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn get_project(&self, project_id: &str, token: Option<&str>) -> Result<Project, ApiError> {
        let path = format!("/api/projects/{}", segment(project_id));
        self.get(&path, token).await
    }

    /// `GET /api/projects/{id}/settings`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn get_settings(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        let path = format!("/api/projects/{}/settings", segment(project_id));
        self.get(&path, token).await
    }

    /// `PUT /api/projects/{id}/settings` with the complete settings object.
    /// Returns the server's canonical copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn update_settings(
        &self,
        project_id: &str,
        settings: &ProjectSettings,
        token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        let path = format!("/api/projects/{}/settings", segment(project_id));
        self.put(&path, settings, token).await
    }
}
