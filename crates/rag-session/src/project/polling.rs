//! Document status polling.
//!
//! ```text
//!          some document non-terminal
//!   Idle ─────────────────────────────▶ Polling
//!    ▲                                     │
//!    └─────────────────────────────────────┘
//!      every document terminal (evaluation or a poll fetch), or close
//! ```
//!
//! Each polling run is a spawned task holding a child of the page's
//! cancellation token. Stopping cancels that child; a run that wakes with a
//! cancelled token exits without touching state, so a stale run can never
//! overwrite the list after a newer decision.

use std::sync::Arc;

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::entities::ProjectDocument;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{PageState, ProjectInner, ProjectPage};
use crate::error::SessionError;

pub(crate) enum PollState {
    Idle,
    Polling {
        cancel: CancellationToken,
        handle: JoinHandle<()>,
    },
}

impl PollState {
    pub(crate) const fn is_active(&self) -> bool {
        matches!(self, Self::Polling { .. })
    }

    fn stop(&mut self) {
        if let Self::Polling { cancel, handle } = std::mem::replace(self, Self::Idle) {
            cancel.cancel();
            handle.abort();
        }
    }
}

fn needs_polling(documents: &[ProjectDocument]) -> bool {
    documents.iter().any(|doc| !doc.is_terminal())
}

impl<B, A> ProjectInner<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    /// Start or stop the poll loop to match the current document list.
    /// Must be called with the state lock held.
    pub(super) fn evaluate_polling(self: &Arc<Self>, state: &mut PageState) {
        let wanted = needs_polling(&state.view.documents) && !self.ctx.cancel.is_cancelled();
        match (state.poll.is_active(), wanted) {
            (false, true) => {
                state.poll = self.spawn_poll();
                tracing::debug!(project_id = %self.project_id, "document polling started");
            }
            (true, false) => {
                state.poll.stop();
                tracing::debug!(project_id = %self.project_id, "document polling stopped");
            }
            _ => {}
        }
        self.polling_tx.send_replace(state.poll.is_active());
    }

    fn spawn_poll(self: &Arc<Self>) -> PollState {
        let cancel = self.ctx.cancel.child_token();
        let handle = tokio::spawn(Arc::clone(self).poll_loop(cancel.clone()));
        PollState::Polling { cancel, handle }
    }

    async fn poll_loop(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticks = time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                _ = ticks.tick() => {}
            }

            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                fetched = self.fetch_documents() => fetched,
            };
            let documents = match fetched {
                Ok(documents) => documents,
                Err(error) => {
                    tracing::warn!(project_id = %self.project_id, %error, "document poll failed");
                    continue;
                }
            };

            let mut state = self.lock();
            if cancel.is_cancelled() {
                return;
            }
            state.view.documents = documents;
            if !needs_polling(&state.view.documents) {
                state.poll = PollState::Idle;
                self.polling_tx.send_replace(false);
                tracing::debug!(project_id = %self.project_id, "documents settled; polling stopped");
                return;
            }
        }
    }

    async fn fetch_documents(&self) -> Result<Vec<ProjectDocument>, SessionError> {
        let token = self.ctx.token().await?;
        Ok(self
            .ctx
            .backend()
            .list_documents(&self.project_id, token.as_deref())
            .await?)
    }

    pub(super) fn close(&self) {
        self.ctx.cancel.cancel();
        self.lock().poll.stop();
        self.polling_tx.send_replace(false);
    }
}

impl<B, A> ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    /// Whether the document poll loop is currently running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.lock().poll.is_active()
    }

    /// Resolve once the poll loop is idle, i.e. every document is terminal.
    ///
    /// # Errors
    ///
    /// [`SessionError::Cancelled`] if the page is closed first.
    pub async fn wait_until_settled(&self) -> Result<(), SessionError> {
        let mut rx = self.inner.polling_tx.subscribe();
        let cancel = &self.inner.ctx.cancel;
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SessionError::Cancelled),
            settled = rx.wait_for(|polling| !*polling) => {
                settled.map(|_| ()).map_err(|_| SessionError::Cancelled)
            }
        }
    }
}
