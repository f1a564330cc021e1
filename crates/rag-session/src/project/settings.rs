//! Settings draft and publish.
//!
//! The draft is edited locally with typed updates and never leaves the client
//! until [`ProjectPage::publish_settings`] sends it whole. The server's reply
//! then becomes both the draft and the published value.

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::settings::{ProjectSettings, SettingsUpdate};

use super::ProjectPage;
use crate::error::SessionError;
use crate::notify::Notice;

impl<B, A> ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    /// Merge updates into the draft. No network.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotLoaded`] if settings have not been loaded; the
    /// draft is left untouched.
    pub fn draft_settings<I>(&self, updates: I) -> Result<ProjectSettings, SessionError>
    where
        I: IntoIterator<Item = SettingsUpdate>,
    {
        let mut state = self.inner.lock();
        let Some(draft) = state.view.settings.as_mut() else {
            tracing::warn!(project_id = %self.inner.project_id, "cannot update settings: not loaded");
            return Err(SessionError::NotLoaded("settings"));
        };
        draft.apply(updates);
        Ok(draft.clone())
    }

    /// Send the whole draft to the server and adopt its reply verbatim.
    ///
    /// Refused with an error notice, and without any request, when settings
    /// are not loaded or nobody is signed in.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`], [`SessionError::NotLoaded`], or
    /// the request error.
    pub async fn publish_settings(&self) -> Result<ProjectSettings, SessionError> {
        let inner = &self.inner;
        let draft = inner.lock().view.settings.clone();
        let draft = match (inner.ctx.require_user(), draft) {
            (Ok(_), Some(draft)) => draft,
            (Err(error), _) => {
                inner.ctx.notify(Notice::error("Cannot save settings"));
                return Err(error);
            }
            (Ok(_), None) => {
                inner.ctx.notify(Notice::error("Cannot save settings"));
                return Err(SessionError::NotLoaded("settings"));
            }
        };

        inner.set_flags(|view| view.publishing = true);
        let result = async {
            let token = inner.ctx.token().await?;
            Ok::<_, SessionError>(
                inner
                    .ctx
                    .guard(inner.ctx.backend().update_settings(
                        &inner.project_id,
                        &draft,
                        token.as_deref(),
                    ))
                    .await??,
            )
        }
        .await;
        inner.set_flags(|view| view.publishing = false);

        match result.and_then(|saved| {
            inner.commit(|state| {
                state.view.settings = Some(saved.clone());
                state.view.published_settings = Some(saved.clone());
            })?;
            Ok(saved)
        }) {
            Ok(saved) => {
                inner.ctx.notify(Notice::success("Settings saved successfully"));
                Ok(saved)
            }
            Err(error) => {
                inner.ctx.report_failure(&error, "Failed to save settings");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, Harness, project};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn draft_is_local_and_immediate() {
        let h = Harness::signed_in(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");
        page.load().await.unwrap();
        let calls_after_load = h.backend.calls().len();

        let draft = page
            .draft_settings([
                SettingsUpdate::ChunksPerSearch(25),
                SettingsUpdate::RagStrategy("hybrid".into()),
            ])
            .unwrap();

        assert_eq!(draft.chunks_per_search, 25);
        let snap = page.snapshot();
        assert_eq!(snap.settings.as_ref().unwrap().rag_strategy, "hybrid");
        assert_eq!(snap.published_settings.as_ref().unwrap().chunks_per_search, 10);
        assert!(snap.has_unpublished_changes());
        assert_eq!(h.backend.calls().len(), calls_after_load);
    }

    #[tokio::test]
    async fn draft_before_load_is_a_no_op() {
        let h = Harness::signed_in(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");

        let err = page
            .draft_settings([SettingsUpdate::ChunksPerSearch(25)])
            .unwrap_err();

        assert!(matches!(err, SessionError::NotLoaded("settings")));
        assert!(page.snapshot().settings.is_none());
    }

    #[tokio::test]
    async fn publish_adopts_server_reply_verbatim() {
        let h = Harness::signed_in(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");
        page.load().await.unwrap();
        page.draft_settings([SettingsUpdate::ChunksPerSearch(25)]).unwrap();
        // the server normalises the value it stores
        h.backend.set(|s| {
            s.settings_reply = Some(ProjectSettings {
                chunks_per_search: 20,
                ..ProjectSettings::default()
            });
        });

        let saved = page.publish_settings().await.unwrap();

        assert_eq!(saved.chunks_per_search, 20);
        let snap = page.snapshot();
        assert_eq!(snap.settings, Some(saved.clone()));
        assert_eq!(snap.published_settings, Some(saved));
        assert!(!snap.has_unpublished_changes());
        assert!(!snap.publishing);
        assert_eq!(h.backend.published().unwrap().chunks_per_search, 25);
        assert_eq!(
            h.notices.last().unwrap(),
            Notice::success("Settings saved successfully")
        );
    }

    #[tokio::test]
    async fn publish_without_loaded_settings_aborts() {
        let h = Harness::signed_in(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");

        let err = page.publish_settings().await.unwrap_err();

        assert!(matches!(err, SessionError::NotLoaded("settings")));
        assert_eq!(h.backend.call_count("update_settings"), 0);
        assert_eq!(h.notices.all(), vec![Notice::error("Cannot save settings")]);
    }

    #[tokio::test]
    async fn publish_failure_keeps_draft() {
        let h = Harness::signed_in(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");
        page.load().await.unwrap();
        page.draft_settings([SettingsUpdate::RerankingEnabled(false)]).unwrap();
        h.backend.set(|s| {
            s.failing.insert("update_settings");
        });

        assert!(page.publish_settings().await.is_err());

        let snap = page.snapshot();
        assert!(!snap.settings.unwrap().reranking_enabled);
        assert!(snap.published_settings.unwrap().reranking_enabled);
        assert!(!snap.publishing);
        assert_eq!(h.notices.last().unwrap(), Notice::error("Failed to save settings"));
    }
}
