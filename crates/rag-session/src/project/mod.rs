//! Project page controller.
//!
//! All page state sits behind one mutex, including the document poll state,
//! so "start or stop polling" is always decided against the document list
//! it applies to. Every mutation is a closure over the current state and
//! re-evaluates polling before the lock is released.

mod documents;
mod polling;
mod settings;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::entities::{Chat, NewChat, Project, ProjectDocument};
use rag_core::settings::ProjectSettings;
use tokio::sync::watch;

use crate::Session;
use crate::context::PageContext;
use crate::error::SessionError;
use crate::notify::Notice;

pub use documents::{UploadFile, UploadReport};
use polling::PollState;

/// Banner text when the aggregate load fails.
pub const LOAD_FAILED: &str = "Failed to fetch data";

/// Everything a front end needs to render the project page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSnapshot {
    pub project: Option<Project>,
    /// Newest first.
    pub chats: Vec<Chat>,
    /// Newest first.
    pub documents: Vec<ProjectDocument>,
    /// Draft settings; what the user is editing.
    pub settings: Option<ProjectSettings>,
    /// Last value confirmed by the server.
    pub published_settings: Option<ProjectSettings>,
    pub selected_document_id: Option<String>,
    pub loading: bool,
    pub creating_chat: bool,
    pub uploading: bool,
    pub publishing: bool,
    pub error: Option<String>,
    pub polling: bool,
}

impl ProjectSnapshot {
    /// The selected document, looked up in the current list.
    #[must_use]
    pub fn selected_document(&self) -> Option<&ProjectDocument> {
        let id = self.selected_document_id.as_deref()?;
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Whether the draft differs from the published settings.
    #[must_use]
    pub fn has_unpublished_changes(&self) -> bool {
        self.settings != self.published_settings
    }
}

pub(crate) struct PageState {
    view: ProjectSnapshot,
    poll: PollState,
}

pub(crate) struct ProjectInner<B, A> {
    ctx: PageContext<B, A>,
    project_id: String,
    poll_interval: Duration,
    state: Mutex<PageState>,
    polling_tx: watch::Sender<bool>,
}

impl<B, A> ProjectInner<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the state unless the view is closed, then re-evaluate
    /// polling under the same lock.
    fn commit<R>(self: &Arc<Self>, f: impl FnOnce(&mut PageState) -> R) -> Result<R, SessionError> {
        let mut state = self.lock();
        self.ctx.ensure_live()?;
        let out = f(&mut state);
        self.evaluate_polling(&mut state);
        Ok(out)
    }

    /// Flag-only update, applied even after close so no busy flag is left set.
    fn set_flags(&self, f: impl FnOnce(&mut ProjectSnapshot)) {
        f(&mut self.lock().view);
    }
}

/// Controller for one project page view.
pub struct ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    inner: Arc<ProjectInner<B, A>>,
}

impl<B, A> ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    pub(crate) fn new(session: Session<B, A>, project_id: String, poll_interval: Duration) -> Self {
        let (polling_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(ProjectInner {
                ctx: PageContext::new(session),
                project_id,
                poll_interval,
                state: Mutex::new(PageState {
                    view: ProjectSnapshot::default(),
                    poll: PollState::Idle,
                }),
                polling_tx,
            }),
        }
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    #[must_use]
    pub fn snapshot(&self) -> ProjectSnapshot {
        let state = self.inner.lock();
        ProjectSnapshot {
            polling: state.poll.is_active(),
            ..state.view.clone()
        }
    }

    /// Fetch project, chats, documents, and settings concurrently and commit
    /// them together. Any single failure leaves the page unpopulated, sets
    /// the error banner, and emits an error notice.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] without a signed-in user (no
    /// request is made), otherwise the first fetch error.
    pub async fn load(&self) -> Result<(), SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        inner.set_flags(|view| {
            view.loading = true;
            view.error = None;
        });

        let fetched = self.fetch_all().await;
        inner.set_flags(|view| view.loading = false);

        match fetched {
            Ok((project, chats, documents, settings)) => {
                tracing::debug!(
                    project_id = %inner.project_id,
                    chats = chats.len(),
                    documents = documents.len(),
                    "project loaded"
                );
                inner.commit(|state| {
                    state.view.project = Some(project);
                    state.view.chats = chats;
                    state.view.documents = documents;
                    state.view.published_settings = Some(settings.clone());
                    state.view.settings = Some(settings);
                })
            }
            Err(error) => {
                if !error.is_cancelled() {
                    inner.set_flags(|view| view.error = Some(LOAD_FAILED.to_string()));
                }
                inner.ctx.report_failure(&error, "Failed to load project");
                Err(error)
            }
        }
    }

    async fn fetch_all(
        &self,
    ) -> Result<(Project, Vec<Chat>, Vec<ProjectDocument>, ProjectSettings), SessionError> {
        let ctx = &self.inner.ctx;
        let id = self.inner.project_id.as_str();
        let token = ctx.token().await?;
        let token = token.as_deref();
        let backend = ctx.backend();
        let fetched = ctx
            .guard(async {
                tokio::try_join!(
                    backend.get_project(id, token),
                    backend.list_chats(id, token),
                    backend.list_documents(id, token),
                    backend.get_settings(id, token),
                )
            })
            .await??;
        Ok(fetched)
    }

    /// Create a chat and prepend it to the list. Without a title, one of the
    /// form `Chat #N` is generated.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] or the request error.
    pub async fn create_chat(&self, title: Option<String>) -> Result<Chat, SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        inner.set_flags(|view| view.creating_chat = true);

        let request = NewChat {
            title: title.unwrap_or_else(default_chat_title),
            project_id: inner.project_id.clone(),
        };
        let result = async {
            let token = inner.ctx.token().await?;
            Ok::<_, SessionError>(
                inner
                    .ctx
                    .guard(inner.ctx.backend().create_chat(&request, token.as_deref()))
                    .await??,
            )
        }
        .await;
        inner.set_flags(|view| view.creating_chat = false);

        match result.and_then(|chat| {
            inner.commit(|state| state.view.chats.insert(0, chat.clone()))?;
            Ok(chat)
        }) {
            Ok(chat) => {
                inner.ctx.notify(Notice::success("Chat created successfully"));
                Ok(chat)
            }
            Err(error) => {
                inner.ctx.report_failure(&error, "Failed to create chat");
                Err(error)
            }
        }
    }

    /// Delete a chat and remove exactly that entry from the list.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] or the request error.
    pub async fn delete_chat(&self, chat_id: &str) -> Result<(), SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        let result = async {
            let token = inner.ctx.token().await?;
            inner
                .ctx
                .guard(inner.ctx.backend().delete_chat(chat_id, token.as_deref()))
                .await??;
            inner.commit(|state| state.view.chats.retain(|chat| chat.id != chat_id))
        }
        .await;

        match result {
            Ok(()) => {
                inner.ctx.notify(Notice::success("Chat deleted successfully"));
                Ok(())
            }
            Err(error) => {
                inner.ctx.report_failure(&error, "Failed to delete chat");
                Err(error)
            }
        }
    }

    /// End the page view: stop polling and cancel in-flight work.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl<B, A> Drop for ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    fn drop(&mut self) {
        self.inner.close();
    }
}

fn default_chat_title() -> String {
    format!("Chat #{}", Utc::now().timestamp_millis().rem_euclid(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::{FakeBackend, Harness, chat, doc, project};
    use pretty_assertions::assert_eq;
    use rag_core::enums::ProcessingStatus::{Completed, Failed};

    #[tokio::test]
    async fn load_commits_all_four_resources() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| {
            s.chats = vec![chat("c2"), chat("c1")];
            s.documents = vec![doc("d1", Completed)];
        });
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");

        page.load().await.unwrap();

        let snap = page.snapshot();
        assert_eq!(snap.project.unwrap().id, "p1");
        assert_eq!(snap.chats.len(), 2);
        assert_eq!(snap.documents.len(), 1);
        assert!(snap.settings.is_some());
        assert_eq!(snap.settings, snap.published_settings);
        assert!(!snap.loading);
        assert!(snap.error.is_none());
        assert!(!snap.polling);
        assert!(h.notices.all().is_empty());
    }

    #[rstest::rstest]
    #[case("get_project")]
    #[case("list_chats")]
    #[case("list_documents")]
    #[case("get_settings")]
    #[tokio::test]
    async fn any_failed_fetch_leaves_page_unpopulated(#[case] failing: &'static str) {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| {
            s.chats = vec![chat("c1")];
            s.documents = vec![doc("d1", Completed)];
            s.failing.insert(failing);
        });
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");

        assert!(page.load().await.is_err());

        let snap = page.snapshot();
        assert!(snap.project.is_none());
        assert!(snap.chats.is_empty());
        assert!(snap.documents.is_empty());
        assert!(snap.settings.is_none());
        assert_eq!(snap.error.as_deref(), Some(LOAD_FAILED));
        assert!(!snap.loading);
        assert_eq!(h.notices.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn load_without_user_makes_no_request() {
        let h = Harness::anonymous(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");

        let err = page.load().await.unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
        assert!(h.backend.calls().is_empty());
        assert!(!page.snapshot().loading);
    }

    #[tokio::test]
    async fn create_chat_prepends_with_generated_title() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.chats = vec![chat("c1")]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        let created = page.create_chat(None).await.unwrap();

        let snap = page.snapshot();
        assert!(created.title.starts_with("Chat #"));
        assert_eq!(snap.chats[0].id, created.id);
        assert_eq!(snap.chats[1].id, "c1");
        assert!(!snap.creating_chat);
        assert_eq!(h.notices.last().unwrap(), Notice::success("Chat created successfully"));
    }

    #[tokio::test]
    async fn create_chat_failure_keeps_list_and_clears_flag() {
        let backend = FakeBackend::with_project(project("p1"));
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();
        h.backend.set(|s| {
            s.failing.insert("create_chat");
        });

        assert!(page.create_chat(Some("Notes".into())).await.is_err());

        let snap = page.snapshot();
        assert!(snap.chats.is_empty());
        assert!(!snap.creating_chat);
        assert_eq!(h.notices.last().unwrap(), Notice::error("Failed to create chat"));
    }

    #[tokio::test]
    async fn delete_chat_removes_exactly_that_entry() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.chats = vec![chat("c3"), chat("c1"), chat("c2")]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        page.delete_chat("c1").await.unwrap();

        let ids: Vec<String> = page.snapshot().chats.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c3", "c2"]);
    }

    #[tokio::test]
    async fn closed_page_discards_in_flight_load() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.hold("get_project");
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");

        let (result, ()) = tokio::join!(page.load(), async {
            tokio::task::yield_now().await;
            page.close();
        });

        assert!(result.unwrap_err().is_cancelled());
        let snap = page.snapshot();
        assert!(snap.project.is_none());
        assert!(snap.error.is_none());
        assert!(!snap.loading);
        assert!(h.notices.all().is_empty());
    }

    #[tokio::test]
    async fn selection_is_looked_up_from_current_list() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.documents = vec![doc("d1", Completed), doc("d2", Failed)]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        page.select_document(Some("d2".into()));
        assert_eq!(page.snapshot().selected_document().unwrap().id, "d2");

        page.select_document(None);
        assert!(page.snapshot().selected_document().is_none());
    }
}
