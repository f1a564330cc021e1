use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::MessageRole;

/// A conversation inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub project_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reference from an assistant message to the chunk it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub document_id: String,
    pub chunk_id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

/// Body of `GET /api/chats/{id}`: the chat row plus its full history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatWithMessages {
    #[serde(flatten)]
    pub chat: Chat,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of `POST /api/projects/{id}/chats/{chat_id}/messages`: the stored
/// user message and the generated reply, always returned together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageExchange {
    #[serde(rename = "userMessage")]
    pub user_message: Message,
    #[serde(rename = "aiMessage")]
    pub ai_message: Message,
}

impl MessageExchange {
    /// The pair in display order: user first, then assistant.
    #[must_use]
    pub fn into_pair(self) -> [Message; 2] {
        [self.user_message, self.ai_message]
    }
}

/// Body of `POST /api/chats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewChat {
    pub title: String,
    pub project_id: String,
}

/// Body of `POST /api/projects/{id}/chats/{chat_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessage {
    pub content: String,
}
