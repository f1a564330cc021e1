//! # rag-core
//!
//! Core types for Ragdesk, shared by every other crate in the workspace:
//! - Entity structs for the backend's records (projects, chats, messages,
//!   documents, settings, chunks, feedback)
//! - Status and role enums (document processing lifecycle, message roles,
//!   feedback ratings)
//! - Typed settings updates for draft editing
//! - The `{ message, data }` response envelope used by every endpoint
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod envelope;
pub mod errors;
pub mod identity;
pub mod settings;
