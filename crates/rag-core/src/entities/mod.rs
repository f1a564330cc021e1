//! Entity structs for the records the backend returns and the payloads it
//! accepts.
//!
//! Every struct derives `Serialize` and `Deserialize`. Optional server-side
//! columns use `#[serde(default)]` so older backends that omit them still
//! decode.

mod chat;
mod chunk;
mod document;
mod feedback;
mod health;
mod project;

pub use chat::{Chat, ChatWithMessages, Citation, Message, MessageExchange, NewChat, SendMessage};
pub use chunk::Chunk;
pub use document::{AddUrl, ConfirmUpload, ProjectDocument, UploadTarget, UploadUrlRequest};
pub use feedback::FeedbackRequest;
pub use health::HealthStatus;
pub use project::{NewProject, Project};
