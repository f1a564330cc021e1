use std::future::Future;

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::identity::AuthIdentity;
use tokio_util::sync::CancellationToken;

use crate::Session;
use crate::error::SessionError;
use crate::notify::Notice;

/// Per-page-view handles: the shared session plus the view's cancellation
/// token. Cancelling the token ends the view.
pub(crate) struct PageContext<B, A> {
    pub session: Session<B, A>,
    pub cancel: CancellationToken,
}

impl<B: RagApi, A: AuthProvider> PageContext<B, A> {
    pub fn new(session: Session<B, A>) -> Self {
        Self {
            session,
            cancel: CancellationToken::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.session.backend
    }

    pub fn require_user(&self) -> Result<AuthIdentity, SessionError> {
        self.session
            .auth
            .identity()
            .ok_or(SessionError::NotAuthenticated)
    }

    /// Fresh bearer token for the next request.
    pub async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.guard(self.session.auth.token()).await??)
    }

    /// Race `fut` against the view's cancellation.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, SessionError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SessionError::Cancelled),
            out = fut => Ok(out),
        }
    }

    pub fn ensure_live(&self) -> Result<(), SessionError> {
        if self.cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        Ok(())
    }

    /// Emit a notice unless the view is already gone.
    pub fn notify(&self, notice: Notice) {
        if !self.cancel.is_cancelled() {
            self.session.notifier.notify(notice);
        }
    }

    /// Standard failure reporting: log, then notify unless cancelled.
    pub fn report_failure(&self, error: &SessionError, message: &str) {
        if error.is_cancelled() {
            return;
        }
        tracing::warn!(%error, "{message}");
        self.notify(Notice::error(message));
    }
}
