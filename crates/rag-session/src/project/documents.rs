//! Document ingestion: parallel presigned uploads, URL sources, deletion.

use std::collections::HashSet;

use futures::future::join_all;
use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::entities::{ProjectDocument, UploadUrlRequest};

use super::{ProjectInner, ProjectPage, ProjectSnapshot};
use crate::error::SessionError;
use crate::notify::Notice;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a multi-file upload. Failed files are listed by name.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<ProjectDocument>,
    pub failed: Vec<(String, SessionError)>,
}

impl UploadReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }

    fn summary(&self) -> Notice {
        let message = format!(
            "{} of {} document(s) uploaded",
            self.uploaded.len(),
            self.total()
        );
        if self.uploaded.is_empty() {
            Notice::info(message)
        } else {
            Notice::success(message)
        }
    }
}

/// Put `added` at the front of the list in the given order. Entries with the
/// same id (already picked up by a poll) are replaced, not duplicated.
fn prepend(view: &mut ProjectSnapshot, added: &[ProjectDocument]) {
    let ids: HashSet<&str> = added.iter().map(|doc| doc.id.as_str()).collect();
    view.documents.retain(|doc| !ids.contains(doc.id.as_str()));
    view.documents.splice(0..0, added.iter().cloned());
}

impl<B, A> ProjectInner<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    /// upload-url, storage PUT, confirm. The first failing step ends the
    /// pipeline for this file only.
    async fn upload_one(&self, file: UploadFile) -> Result<ProjectDocument, SessionError> {
        let ctx = &self.ctx;
        let backend = ctx.backend();
        let token = ctx.token().await?;
        let token = token.as_deref();

        let request = UploadUrlRequest {
            filename: file.filename,
            file_size: u64::try_from(file.bytes.len()).unwrap_or(u64::MAX),
            file_type: file.content_type,
        };
        let target = ctx
            .guard(backend.request_upload_url(&self.project_id, &request, token))
            .await??;
        ctx.guard(backend.upload_to_storage(&target.upload_url, file.bytes, &request.file_type))
            .await??;
        let document = ctx
            .guard(backend.confirm_upload(&self.project_id, &target.s3_key, token))
            .await??;
        tracing::debug!(
            project_id = %self.project_id,
            document_id = %document.id,
            filename = %request.filename,
            "upload confirmed"
        );
        Ok(document)
    }
}

impl<B, A> ProjectPage<B, A>
where
    B: RagApi + 'static,
    A: AuthProvider + 'static,
{
    /// Upload every file concurrently. Each file succeeds or fails on its
    /// own; failures are notified one per file. Successful documents are
    /// prepended in input order in a single update, followed by one summary
    /// notice.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] before anything is sent, or
    /// [`SessionError::Cancelled`] if the page closed. Per-file failures are
    /// reported in the [`UploadReport`], not as an error.
    pub async fn upload_documents(&self, files: Vec<UploadFile>) -> Result<UploadReport, SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        if files.is_empty() {
            return Ok(UploadReport::default());
        }
        inner.set_flags(|view| view.uploading = true);

        let settled = join_all(files.into_iter().map(|file| async move {
            let filename = file.filename.clone();
            (filename, inner.upload_one(file).await)
        }))
        .await;
        inner.set_flags(|view| view.uploading = false);

        let mut report = UploadReport::default();
        for (filename, result) in settled {
            match result {
                Ok(document) => report.uploaded.push(document),
                Err(error) => {
                    inner
                        .ctx
                        .report_failure(&error, &format!("Failed to upload {filename}"));
                    report.failed.push((filename, error));
                }
            }
        }

        inner.commit(|state| prepend(&mut state.view, &report.uploaded))?;
        inner.ctx.notify(report.summary());
        Ok(report)
    }

    /// Ingest a web page as a document and prepend it.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] or the request error.
    pub async fn add_url(&self, url: &str) -> Result<ProjectDocument, SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        let result = async {
            let token = inner.ctx.token().await?;
            let document = inner
                .ctx
                .guard(inner.ctx.backend().add_url(&inner.project_id, url, token.as_deref()))
                .await??;
            inner.commit(|state| prepend(&mut state.view, std::slice::from_ref(&document)))?;
            Ok::<_, SessionError>(document)
        }
        .await;

        match result {
            Ok(document) => {
                inner.ctx.notify(Notice::success("URL added"));
                Ok(document)
            }
            Err(error) => {
                inner.ctx.report_failure(&error, "Failed to add URL");
                Err(error)
            }
        }
    }

    /// Delete a document and remove exactly that entry. A selection pointing
    /// at it is cleared.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] or the request error.
    pub async fn delete_document(&self, document_id: &str) -> Result<(), SessionError> {
        let inner = &self.inner;
        inner.ctx.require_user()?;
        let result = async {
            let token = inner.ctx.token().await?;
            inner
                .ctx
                .guard(inner.ctx.backend().delete_document(
                    &inner.project_id,
                    document_id,
                    token.as_deref(),
                ))
                .await??;
            inner.commit(|state| {
                state.view.documents.retain(|doc| doc.id != document_id);
                if state.view.selected_document_id.as_deref() == Some(document_id) {
                    state.view.selected_document_id = None;
                }
            })
        }
        .await;

        match result {
            Ok(()) => {
                inner.ctx.notify(Notice::success("Document deleted"));
                Ok(())
            }
            Err(error) => {
                inner.ctx.report_failure(&error, "Failed to delete document");
                Err(error)
            }
        }
    }

    /// Select a document for the detail view, or clear the selection.
    pub fn select_document(&self, document_id: Option<String>) {
        self.inner.set_flags(|view| view.selected_document_id = document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::{FakeBackend, Harness, doc, project};
    use pretty_assertions::assert_eq;
    use rag_core::enums::ProcessingStatus::{Completed, Queued};

    fn file(name: &str) -> UploadFile {
        UploadFile {
            filename: name.to_string(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    fn ids(page_docs: &[ProjectDocument]) -> Vec<&str> {
        page_docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn all_uploads_succeed() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.documents = vec![doc("old", Completed)]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        let report = page
            .upload_documents(vec![file("a.pdf"), file("b.pdf")])
            .await
            .unwrap();

        assert_eq!(report.uploaded.len(), 2);
        assert!(report.failed.is_empty());
        let snap = page.snapshot();
        assert_eq!(ids(&snap.documents), vec!["doc-a.pdf", "doc-b.pdf", "old"]);
        assert!(!snap.uploading);
        assert!(snap.polling, "confirmed uploads are queued, so polling starts");
        assert_eq!(
            h.notices.all(),
            vec![Notice::success("2 of 2 document(s) uploaded")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn one_failure_does_not_block_the_others() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| {
            s.failing_uploads.insert("b.pdf".into());
        });
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        let report = page
            .upload_documents(vec![file("a.pdf"), file("b.pdf"), file("c.pdf")])
            .await
            .unwrap();

        assert_eq!(report.uploaded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "b.pdf");
        assert_eq!(ids(&page.snapshot().documents), vec!["doc-a.pdf", "doc-c.pdf"]);

        let errors: Vec<Notice> = h
            .notices
            .all()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect();
        assert_eq!(errors, vec![Notice::error("Failed to upload b.pdf")]);
        assert_eq!(
            h.notices.last().unwrap(),
            Notice::success("2 of 3 document(s) uploaded")
        );
        // c.pdf still went through all three steps after b.pdf failed
        assert_eq!(h.backend.call_count("confirm_upload"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn every_upload_failing_adds_nothing() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| {
            s.failing.insert("request_upload_url");
        });
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        let report = page
            .upload_documents(vec![file("a.pdf"), file("b.pdf")])
            .await
            .unwrap();

        assert!(report.uploaded.is_empty());
        assert!(page.snapshot().documents.is_empty());
        assert_eq!(h.notices.count(NoticeLevel::Error), 2);
        assert_eq!(h.backend.call_count("upload_to_storage"), 0);
        assert!(!page.is_polling());
    }

    #[test]
    fn prepend_replaces_documents_already_seen_by_a_poll() {
        let mut view = ProjectSnapshot {
            documents: vec![doc("doc-a.pdf", Queued), doc("old", Completed)],
            ..ProjectSnapshot::default()
        };

        prepend(&mut view, &[doc("doc-a.pdf", Queued), doc("doc-b.pdf", Queued)]);

        assert_eq!(ids(&view.documents), vec!["doc-a.pdf", "doc-b.pdf", "old"]);
    }

    #[tokio::test(start_paused = true)]
    async fn add_url_prepends_and_starts_polling() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.documents = vec![doc("old", Completed)]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();

        let added = page.add_url("https://example.com/post").await.unwrap();

        assert!(added.is_url_source());
        let snap = page.snapshot();
        assert_eq!(snap.documents[0].id, added.id);
        assert_eq!(snap.documents.len(), 2);
        assert!(snap.polling);
    }

    #[tokio::test]
    async fn delete_document_clears_matching_selection() {
        let backend = FakeBackend::with_project(project("p1"));
        backend.set(|s| s.documents = vec![doc("d1", Completed), doc("d2", Completed)]);
        let h = Harness::signed_in(backend);
        let page = h.project_page("p1");
        page.load().await.unwrap();
        page.select_document(Some("d1".into()));

        page.delete_document("d1").await.unwrap();

        let snap = page.snapshot();
        assert_eq!(ids(&snap.documents), vec!["d2"]);
        assert!(snap.selected_document_id.is_none());
    }

    #[tokio::test]
    async fn upload_requires_user() {
        let h = Harness::anonymous(FakeBackend::with_project(project("p1")));
        let page = h.project_page("p1");

        let err = page.upload_documents(vec![file("a.pdf")]).await.unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
        assert!(h.backend.calls().is_empty());
    }
}
