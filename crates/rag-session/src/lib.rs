//! # rag-session
//!
//! Page controllers for the Ragdesk client.
//!
//! A [`Session`] bundles the backend, the auth provider, and the notifier.
//! Each page view is created from it and owns its own state plus a
//! cancellation token: closing (or dropping) the view stops its background
//! document polling and makes in-flight operations resolve to
//! [`SessionError::Cancelled`] without committing.
//!
//! - [`ProjectPage`]: aggregate load, chats, document ingestion and status
//!   polling, settings draft/publish.
//! - [`ChatPage`]: message history, send, feedback.
//! - [`CitationViewer`]: one cited chunk and its detail view.

mod context;

pub mod chat;
pub mod citation;
pub mod error;
pub mod notify;
pub mod project;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::identity::AuthIdentity;

pub use chat::{ChatPage, ChatSnapshot, FeedbackForm, PendingFeedback};
pub use citation::{ChunkDetail, CitationSnapshot, CitationViewer};
pub use error::SessionError;
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use project::{ProjectPage, ProjectSnapshot, UploadFile, UploadReport};

/// Shared handles every page view is built from.
pub struct Session<B, A> {
    backend: Arc<B>,
    auth: Arc<A>,
    notifier: Arc<dyn Notifier>,
}

impl<B, A> Clone for Session<B, A> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            auth: Arc::clone(&self.auth),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<B, A> Session<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    pub fn new(backend: B, auth: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend: Arc::new(backend),
            auth: Arc::new(auth),
            notifier,
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn identity(&self) -> Option<AuthIdentity> {
        self.auth.identity()
    }

    /// Open a project page view. Nothing is fetched until
    /// [`ProjectPage::load`].
    #[must_use]
    pub fn project_page(
        &self,
        project_id: impl Into<String>,
        poll_interval: Duration,
    ) -> ProjectPage<B, A> {
        ProjectPage::new(self.clone(), project_id.into(), poll_interval)
    }

    #[must_use]
    pub fn chat_page(
        &self,
        project_id: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> ChatPage<B, A> {
        ChatPage::new(self.clone(), project_id.into(), chat_id.into())
    }

    #[must_use]
    pub fn citation_viewer(&self, project_id: impl Into<String>) -> CitationViewer<B, A> {
        CitationViewer::new(self.clone(), project_id.into())
    }
}
