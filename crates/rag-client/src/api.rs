//! The backend surface the page controllers are written against.

use std::future::Future;

use rag_core::entities::{
    Chat, ChatWithMessages, Chunk, FeedbackRequest, MessageExchange, NewChat, Project,
    ProjectDocument, UploadTarget, UploadUrlRequest,
};
use rag_core::settings::ProjectSettings;

use crate::{ApiClient, error::ApiError};

/// Controller-facing subset of the backend API.
///
/// [`ApiClient`] is the production implementation; tests drive the
/// controllers with an in-memory fake. Every method takes the bearer token
/// last, `None` meaning an anonymous request.
pub trait RagApi: Send + Sync {
    fn get_project(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Project, ApiError>> + Send;

    fn list_chats(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Chat>, ApiError>> + Send;

    fn list_documents(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ProjectDocument>, ApiError>> + Send;

    fn get_settings(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ProjectSettings, ApiError>> + Send;

    fn update_settings(
        &self,
        project_id: &str,
        settings: &ProjectSettings,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ProjectSettings, ApiError>> + Send;

    fn get_chat(
        &self,
        chat_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ChatWithMessages, ApiError>> + Send;

    fn create_chat(
        &self,
        chat: &NewChat,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Chat, ApiError>> + Send;

    fn delete_chat(
        &self,
        chat_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn send_message(
        &self,
        project_id: &str,
        chat_id: &str,
        content: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<MessageExchange, ApiError>> + Send;

    fn submit_feedback(
        &self,
        feedback: &FeedbackRequest,
        token: Option<&str>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn request_upload_url(
        &self,
        project_id: &str,
        request: &UploadUrlRequest,
        token: Option<&str>,
    ) -> impl Future<Output = Result<UploadTarget, ApiError>> + Send;

    fn upload_to_storage(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn confirm_upload(
        &self,
        project_id: &str,
        s3_key: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ProjectDocument, ApiError>> + Send;

    fn add_url(
        &self,
        project_id: &str,
        url: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ProjectDocument, ApiError>> + Send;

    fn delete_document(
        &self,
        project_id: &str,
        document_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn get_chunk(
        &self,
        project_id: &str,
        document_id: &str,
        chunk_id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Chunk, ApiError>> + Send;
}

impl RagApi for ApiClient {
    async fn get_project(&self, project_id: &str, token: Option<&str>) -> Result<Project, ApiError> {
        Self::get_project(self, project_id, token).await
    }

    async fn list_chats(&self, project_id: &str, token: Option<&str>) -> Result<Vec<Chat>, ApiError> {
        Self::list_chats(self, project_id, token).await
    }

    async fn list_documents(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<ProjectDocument>, ApiError> {
        Self::list_documents(self, project_id, token).await
    }

    async fn get_settings(
        &self,
        project_id: &str,
        token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        Self::get_settings(self, project_id, token).await
    }

    async fn update_settings(
        &self,
        project_id: &str,
        settings: &ProjectSettings,
        token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        Self::update_settings(self, project_id, settings, token).await
    }

    async fn get_chat(
        &self,
        chat_id: &str,
        token: Option<&str>,
    ) -> Result<ChatWithMessages, ApiError> {
        Self::get_chat(self, chat_id, token).await
    }

    async fn create_chat(&self, chat: &NewChat, token: Option<&str>) -> Result<Chat, ApiError> {
        Self::create_chat(self, chat, token).await
    }

    async fn delete_chat(&self, chat_id: &str, token: Option<&str>) -> Result<(), ApiError> {
        Self::delete_chat(self, chat_id, token).await
    }

    async fn send_message(
        &self,
        project_id: &str,
        chat_id: &str,
        content: &str,
        token: Option<&str>,
    ) -> Result<MessageExchange, ApiError> {
        Self::send_message(self, project_id, chat_id, content, token).await
    }

    async fn submit_feedback(
        &self,
        feedback: &FeedbackRequest,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        Self::submit_feedback(self, feedback, token).await
    }

    async fn request_upload_url(
        &self,
        project_id: &str,
        request: &UploadUrlRequest,
        token: Option<&str>,
    ) -> Result<UploadTarget, ApiError> {
        Self::request_upload_url(self, project_id, request, token).await
    }

    async fn upload_to_storage(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        Self::upload_to_storage(self, upload_url, bytes, content_type).await
    }

    async fn confirm_upload(
        &self,
        project_id: &str,
        s3_key: &str,
        token: Option<&str>,
    ) -> Result<ProjectDocument, ApiError> {
        Self::confirm_upload(self, project_id, s3_key, token).await
    }

    async fn add_url(
        &self,
        project_id: &str,
        url: &str,
        token: Option<&str>,
    ) -> Result<ProjectDocument, ApiError> {
        Self::add_url(self, project_id, url, token).await
    }

    async fn delete_document(
        &self,
        project_id: &str,
        document_id: &str,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        Self::delete_document(self, project_id, document_id, token).await
    }

    async fn get_chunk(
        &self,
        project_id: &str,
        document_id: &str,
        chunk_id: &str,
        token: Option<&str>,
    ) -> Result<Chunk, ApiError> {
        Self::get_chunk(self, project_id, document_id, chunk_id, token).await
    }
}
