pub mod auth;
pub mod chat;
pub mod citation;
pub mod dispatch;
pub mod doc;
pub mod health;
pub mod project;
pub mod settings;
