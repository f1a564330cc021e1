mod auth;
mod chat;
mod doc;
mod project;
mod settings;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use chat::{ChatCommands, ChatFeedbackArgs, ChatRef, ChatSendArgs};
pub use doc::{DocAddUrlArgs, DocCommands, DocRef, DocUploadArgs};
pub use project::ProjectCommands;
pub use settings::{SettingsCommands, SettingsPublishArgs};
