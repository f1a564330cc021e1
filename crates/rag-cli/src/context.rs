use std::sync::Arc;

use rag_auth::{AuthError, AuthProvider, StoredSession};
use rag_client::ApiClient;
use rag_config::RagConfig;
use rag_session::{ChatPage, CitationViewer, ProjectPage, Session};

use crate::cli::GlobalFlags;
use crate::notifier::TerminalNotifier;

pub type Backend = ApiClient;
pub type Auth = StoredSession;

/// Everything a command handler needs: config, the raw API client, and the
/// session the page controllers are opened from.
pub struct AppContext {
    pub config: RagConfig,
    session: Session<Backend, Auth>,
    auth: Auth,
}

impl AppContext {
    pub fn init(config: RagConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let client = ApiClient::new(&config.api)?;
        tracing::debug!(
            base_url = client.base_url(),
            verbose = flags.verbose,
            "api client ready"
        );
        let auth = StoredSession::new();
        let session = Session::new(client, auth, Arc::new(TerminalNotifier));
        Ok(Self {
            config,
            session,
            auth,
        })
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        self.session.backend()
    }

    /// Token for calls made directly on the client (no page controller).
    pub async fn token(&self) -> anyhow::Result<Option<String>> {
        Ok(self.auth.token().await?)
    }

    /// Token for endpoints that never accept anonymous calls.
    pub async fn require_token(&self) -> anyhow::Result<String> {
        self.token()
            .await?
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    #[must_use]
    pub fn project_page(&self, project_id: &str) -> ProjectPage<Backend, Auth> {
        self.session
            .project_page(project_id, self.config.polling.interval())
    }

    #[must_use]
    pub fn chat_page(&self, project_id: &str, chat_id: &str) -> ChatPage<Backend, Auth> {
        self.session.chat_page(project_id, chat_id)
    }

    #[must_use]
    pub fn citation_viewer(&self, project_id: &str) -> CitationViewer<Backend, Auth> {
        self.session.citation_viewer(project_id)
    }
}
