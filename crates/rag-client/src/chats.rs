//! Chat, message, and feedback endpoints.

use rag_core::entities::{
    Chat, ChatWithMessages, FeedbackRequest, MessageExchange, NewChat, SendMessage,
};

use crate::{ApiClient, error::ApiError, http::segment};

impl ApiClient {
    /// `GET /api/projects/{id}/chats`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn list_chats(&self, project_id: &str, token: Option<&str>) -> Result<Vec<Chat>, ApiError> {
        let path = format!("/api/projects/{}/chats", segment(project_id));
        self.get(&path, token).await
    }

    /// `GET /api/chats/{id}`: the chat with its message history.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn get_chat(
        &self,
        chat_id: &str,
        token: Option<&str>,
    ) -> Result<ChatWithMessages, ApiError> {
        let path = format!("/api/chats/{}", segment(chat_id));
        self.get(&path, token).await
    }

    /// `POST /api/chats`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn create_chat(&self, chat: &NewChat, token: Option<&str>) -> Result<Chat, ApiError> {
        self.post("/api/chats", chat, token).await
    }

    /// `DELETE /api/chats/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_chat(&self, chat_id: &str, token: Option<&str>) -> Result<(), ApiError> {
        let path = format!("/api/chats/{}", segment(chat_id));
        self.delete(&path, token).await
    }

    /// `POST /api/projects/{id}/chats/{chat_id}/messages`: stores the user
    /// message and returns it together with the generated reply.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be decoded.
    pub async fn send_message(
        &self,
        project_id: &str,
        chat_id: &str,
        content: &str,
        token: Option<&str>,
    ) -> Result<MessageExchange, ApiError> {
        let path = format!(
            "/api/projects/{}/chats/{}/messages",
            segment(project_id),
            segment(chat_id)
        );
        let body = SendMessage {
            content: content.to_string(),
        };
        self.post(&path, &body, token).await
    }

    /// `POST /api/feedback`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn submit_feedback(
        &self,
        feedback: &FeedbackRequest,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.post_discarding("/api/feedback", feedback, token)
            .await
    }
}
