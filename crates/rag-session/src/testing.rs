//! In-memory backend and harness for controller tests.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rag_auth::StaticSession;
use rag_client::{ApiError, RagApi};
use rag_core::entities::{
    Chat, ChatWithMessages, Chunk, FeedbackRequest, Message, MessageExchange, NewChat, Project,
    ProjectDocument, UploadTarget, UploadUrlRequest,
};
use rag_core::enums::{MessageRole, ProcessingStatus};
use rag_core::settings::ProjectSettings;

use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::{ChatPage, ProjectPage, Session};

pub fn project(id: &str) -> Project {
    Project {
        id: id.to_string(),
        name: "Research".into(),
        description: String::new(),
        created_at: None,
    }
}

pub fn chat(id: &str) -> Chat {
    Chat {
        id: id.to_string(),
        title: format!("Chat {id}"),
        project_id: "p1".into(),
        created_at: None,
    }
}

pub fn doc(id: &str, status: ProcessingStatus) -> ProjectDocument {
    ProjectDocument {
        id: id.to_string(),
        project_id: "p1".into(),
        filename: format!("{id}.pdf"),
        s3_key: format!("projects/p1/documents/{id}.pdf"),
        file_size: 1024,
        file_type: "application/pdf".into(),
        processing_status: status,
        source_url: None,
        source_type: None,
        created_at: None,
    }
}

fn message(chat_id: &str, id: String, role: MessageRole, content: &str) -> Message {
    Message {
        id,
        chat_id: chat_id.to_string(),
        role,
        content: content.to_string(),
        created_at: None,
        citations: Vec::new(),
    }
}

pub fn chat_with_history(id: &str, messages: usize) -> ChatWithMessages {
    let messages = (0..messages)
        .map(|i| {
            let role = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            message(id, format!("m-{i}"), role, "earlier")
        })
        .collect();
    ChatWithMessages {
        chat: chat(id),
        messages,
    }
}

#[derive(Default)]
pub struct FakeState {
    pub project: Option<Project>,
    pub chats: Vec<Chat>,
    pub documents: Vec<ProjectDocument>,
    /// Scripted responses for document list calls after the first one.
    /// Once drained, the current `documents` are served.
    pub document_polls: VecDeque<Result<Vec<ProjectDocument>, u16>>,
    pub settings: ProjectSettings,
    /// Returned by `update_settings` instead of echoing the request.
    pub settings_reply: Option<ProjectSettings>,
    pub chat: Option<ChatWithMessages>,
    pub chunk: Option<Chunk>,
    /// Operations that answer with a 500.
    pub failing: HashSet<&'static str>,
    /// Filenames whose storage PUT is rejected.
    pub failing_uploads: HashSet<String>,
    /// Operations that never complete.
    held: HashSet<&'static str>,
    calls: Vec<&'static str>,
    published: Option<ProjectSettings>,
    feedback: Vec<FeedbackRequest>,
    next_id: usize,
}

impl FakeState {
    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn with_project(project: Project) -> Self {
        let backend = Self::default();
        backend.set(|s| s.project = Some(project));
        backend
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.lock());
    }

    pub fn hold(&self, op: &'static str) {
        self.lock().held.insert(op);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn published(&self) -> Option<ProjectSettings> {
        self.lock().published.clone()
    }

    pub fn feedback(&self) -> Vec<FeedbackRequest> {
        self.lock().feedback.clone()
    }

    async fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        let (held, failing) = {
            let mut s = self.lock();
            s.calls.push(op);
            (s.held.contains(op), s.failing.contains(op))
        };
        if held {
            std::future::pending::<()>().await;
        }
        if failing {
            return Err(ApiError::Status { status: 500 });
        }
        Ok(())
    }
}

const NOT_FOUND: ApiError = ApiError::Status { status: 404 };

impl RagApi for FakeBackend {
    async fn get_project(&self, _project_id: &str, _token: Option<&str>) -> Result<Project, ApiError> {
        self.enter("get_project").await?;
        self.lock().project.clone().ok_or(NOT_FOUND)
    }

    async fn list_chats(&self, _project_id: &str, _token: Option<&str>) -> Result<Vec<Chat>, ApiError> {
        self.enter("list_chats").await?;
        Ok(self.lock().chats.clone())
    }

    async fn list_documents(
        &self,
        _project_id: &str,
        _token: Option<&str>,
    ) -> Result<Vec<ProjectDocument>, ApiError> {
        self.enter("list_documents").await?;
        let mut s = self.lock();
        let first_call = s.calls.iter().filter(|c| **c == "list_documents").count() == 1;
        if !first_call && let Some(next) = s.document_polls.pop_front() {
            s.documents = next.map_err(|status| ApiError::Status { status })?;
        }
        Ok(s.documents.clone())
    }

    async fn get_settings(
        &self,
        _project_id: &str,
        _token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        self.enter("get_settings").await?;
        Ok(self.lock().settings.clone())
    }

    async fn update_settings(
        &self,
        _project_id: &str,
        settings: &ProjectSettings,
        _token: Option<&str>,
    ) -> Result<ProjectSettings, ApiError> {
        self.enter("update_settings").await?;
        let mut s = self.lock();
        s.published = Some(settings.clone());
        let saved = s.settings_reply.clone().unwrap_or_else(|| settings.clone());
        s.settings = saved.clone();
        Ok(saved)
    }

    async fn get_chat(&self, chat_id: &str, _token: Option<&str>) -> Result<ChatWithMessages, ApiError> {
        self.enter("get_chat").await?;
        self.lock()
            .chat
            .clone()
            .filter(|chat| chat.chat.id == chat_id)
            .ok_or(NOT_FOUND)
    }

    async fn create_chat(&self, new: &NewChat, _token: Option<&str>) -> Result<Chat, ApiError> {
        self.enter("create_chat").await?;
        let mut s = self.lock();
        let created = Chat {
            id: format!("c-new-{}", s.next_id()),
            title: new.title.clone(),
            project_id: new.project_id.clone(),
            created_at: None,
        };
        s.chats.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_chat(&self, chat_id: &str, _token: Option<&str>) -> Result<(), ApiError> {
        self.enter("delete_chat").await?;
        self.lock().chats.retain(|chat| chat.id != chat_id);
        Ok(())
    }

    async fn send_message(
        &self,
        _project_id: &str,
        chat_id: &str,
        content: &str,
        _token: Option<&str>,
    ) -> Result<MessageExchange, ApiError> {
        self.enter("send_message").await?;
        let mut s = self.lock();
        let user = message(chat_id, format!("m-u{}", s.next_id()), MessageRole::User, content);
        let reply = message(chat_id, format!("m-a{}", s.next_id()), MessageRole::Assistant, "reply");
        Ok(MessageExchange {
            user_message: user,
            ai_message: reply,
        })
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest, _token: Option<&str>) -> Result<(), ApiError> {
        self.enter("submit_feedback").await?;
        self.lock().feedback.push(feedback.clone());
        Ok(())
    }

    async fn request_upload_url(
        &self,
        project_id: &str,
        request: &UploadUrlRequest,
        _token: Option<&str>,
    ) -> Result<UploadTarget, ApiError> {
        self.enter("request_upload_url").await?;
        Ok(UploadTarget {
            upload_url: format!("https://storage.test/{}", request.filename),
            s3_key: format!("projects/{project_id}/documents/{}", request.filename),
            document: None,
        })
    }

    async fn upload_to_storage(
        &self,
        upload_url: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), ApiError> {
        self.enter("upload_to_storage").await?;
        let filename = upload_url.rsplit('/').next().unwrap_or_default();
        if self.lock().failing_uploads.contains(filename) {
            return Err(ApiError::Status { status: 403 });
        }
        Ok(())
    }

    async fn confirm_upload(
        &self,
        _project_id: &str,
        s3_key: &str,
        _token: Option<&str>,
    ) -> Result<ProjectDocument, ApiError> {
        self.enter("confirm_upload").await?;
        let filename = s3_key.rsplit('/').next().unwrap_or_default();
        let confirmed = ProjectDocument {
            filename: filename.to_string(),
            s3_key: s3_key.to_string(),
            ..doc(&format!("doc-{filename}"), ProcessingStatus::Queued)
        };
        self.lock().documents.insert(0, confirmed.clone());
        Ok(confirmed)
    }

    async fn add_url(&self, _project_id: &str, url: &str, _token: Option<&str>) -> Result<ProjectDocument, ApiError> {
        self.enter("add_url").await?;
        let mut s = self.lock();
        let added = ProjectDocument {
            filename: url.to_string(),
            s3_key: String::new(),
            file_size: 0,
            file_type: "text/html".into(),
            source_url: Some(url.to_string()),
            source_type: Some("url".into()),
            ..doc(&format!("url-{}", s.next_id()), ProcessingStatus::Queued)
        };
        s.documents.insert(0, added.clone());
        Ok(added)
    }

    async fn delete_document(
        &self,
        _project_id: &str,
        document_id: &str,
        _token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.enter("delete_document").await?;
        self.lock().documents.retain(|doc| doc.id != document_id);
        Ok(())
    }

    async fn get_chunk(
        &self,
        _project_id: &str,
        _document_id: &str,
        chunk_id: &str,
        _token: Option<&str>,
    ) -> Result<Chunk, ApiError> {
        self.enter("get_chunk").await?;
        self.lock()
            .chunk
            .clone()
            .filter(|chunk| chunk.id == chunk_id)
            .ok_or(NOT_FOUND)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn all(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.lock().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}

pub struct Harness {
    pub backend: FakeBackend,
    pub notices: Arc<RecordingNotifier>,
    pub session: Session<FakeBackend, StaticSession>,
}

impl Harness {
    fn new(backend: FakeBackend, auth: StaticSession) -> Self {
        let notices = Arc::new(RecordingNotifier::default());
        let session = Session::new(backend.clone(), auth, notices.clone());
        Self {
            backend,
            notices,
            session,
        }
    }

    pub fn signed_in(backend: FakeBackend) -> Self {
        Self::new(backend, StaticSession::new("user_1", "tok"))
    }

    pub fn anonymous(backend: FakeBackend) -> Self {
        Self::new(backend, StaticSession::anonymous())
    }

    pub fn project_page(&self, project_id: &str) -> ProjectPage<FakeBackend, StaticSession> {
        self.session.project_page(project_id, Duration::from_secs(3))
    }

    pub fn chat_page(&self, project_id: &str, chat_id: &str) -> ChatPage<FakeBackend, StaticSession> {
        self.session.chat_page(project_id, chat_id)
    }
}
