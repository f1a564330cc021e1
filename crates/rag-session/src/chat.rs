//! Chat page controller: history, send, feedback.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::entities::{ChatWithMessages, FeedbackRequest, Message};
use rag_core::enums::FeedbackRating;

use crate::Session;
use crate::context::PageContext;
use crate::error::SessionError;
use crate::notify::Notice;

pub const CHAT_OR_USER_MISSING: &str = "Chat or user not found";
pub const SEND_FAILED: &str = "Failed to send message";

/// Feedback flow opened on one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeedback {
    pub message_id: String,
    pub rating: FeedbackRating,
}

/// What the user filled in when submitting feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    pub rating: FeedbackRating,
    pub comment: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub chat: Option<ChatWithMessages>,
    pub loading: bool,
    pub sending: bool,
    pub error: Option<String>,
    pub feedback: Option<PendingFeedback>,
}

impl ChatSnapshot {
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.chat
            .as_ref()
            .map(|chat| chat.messages.as_slice())
            .unwrap_or_default()
    }
}

pub struct ChatPage<B, A> {
    ctx: PageContext<B, A>,
    project_id: String,
    chat_id: String,
    state: Mutex<ChatSnapshot>,
}

impl<B: RagApi, A: AuthProvider> ChatPage<B, A> {
    pub(crate) fn new(session: Session<B, A>, project_id: String, chat_id: String) -> Self {
        Self {
            ctx: PageContext::new(session),
            project_id,
            chat_id,
            state: Mutex::new(ChatSnapshot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit<R>(&self, f: impl FnOnce(&mut ChatSnapshot) -> R) -> Result<R, SessionError> {
        let mut state = self.lock();
        self.ctx.ensure_live()?;
        Ok(f(&mut state))
    }

    #[must_use]
    pub fn snapshot(&self) -> ChatSnapshot {
        self.lock().clone()
    }

    /// Fetch the chat and its history.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] (no request made) or the request
    /// error; the chat stays unloaded on failure.
    pub async fn load(&self) -> Result<(), SessionError> {
        self.ctx.require_user()?;
        self.lock().loading = true;

        let result = async {
            let token = self.ctx.token().await?;
            Ok::<_, SessionError>(
                self.ctx
                    .guard(self.ctx.backend().get_chat(&self.chat_id, token.as_deref()))
                    .await??,
            )
        }
        .await;
        self.lock().loading = false;

        match result.and_then(|chat| self.commit(|state| state.chat = Some(chat))) {
            Ok(()) => {
                self.ctx.notify(Notice::success("Chat loaded"));
                Ok(())
            }
            Err(error) => {
                self.ctx
                    .report_failure(&error, "Failed to load chat. Please try again.");
                Err(error)
            }
        }
    }

    /// Send a message and append the stored user message and the reply
    /// together. On failure the history is unchanged and the error string
    /// is set.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotLoaded`] / [`SessionError::NotAuthenticated`]
    /// (no request made) or the request error.
    pub async fn send_message(&self, content: &str) -> Result<(), SessionError> {
        let chat_id = {
            let mut state = self.lock();
            state.error = None;
            state.sending = true;
            let precondition = match (&state.chat, self.ctx.require_user()) {
                (Some(chat), Ok(_)) => Ok(chat.chat.id.clone()),
                (None, _) => Err(SessionError::NotLoaded("chat")),
                (Some(_), Err(error)) => Err(error),
            };
            match precondition {
                Ok(chat_id) => chat_id,
                Err(error) => {
                    state.error = Some(CHAT_OR_USER_MISSING.to_string());
                    state.sending = false;
                    return Err(error);
                }
            }
        };

        let result = async {
            let token = self.ctx.token().await?;
            Ok::<_, SessionError>(
                self.ctx
                    .guard(self.ctx.backend().send_message(
                        &self.project_id,
                        &chat_id,
                        content,
                        token.as_deref(),
                    ))
                    .await??,
            )
        }
        .await;
        self.lock().sending = false;

        let committed = result.and_then(|exchange| {
            self.commit(|state| {
                if let Some(chat) = state.chat.as_mut() {
                    chat.messages.extend(exchange.into_pair());
                }
            })
        });
        match committed {
            Ok(()) => {
                self.ctx.notify(Notice::success("Message sent"));
                Ok(())
            }
            Err(error) => {
                if !error.is_cancelled() {
                    self.lock().error = Some(SEND_FAILED.to_string());
                }
                self.ctx.report_failure(&error, SEND_FAILED);
                Err(error)
            }
        }
    }

    /// Open the feedback flow for a message.
    pub fn open_feedback(&self, message_id: impl Into<String>, rating: FeedbackRating) {
        self.lock().feedback = Some(PendingFeedback {
            message_id: message_id.into(),
            rating,
        });
    }

    pub fn close_feedback(&self) {
        self.lock().feedback = None;
    }

    /// Submit feedback for the message the flow was opened on. The flow is
    /// closed whatever the outcome.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`], [`SessionError::NotLoaded`] when
    /// no flow is open, or the request error.
    pub async fn submit_feedback(&self, form: FeedbackForm) -> Result<(), SessionError> {
        self.ctx.require_user()?;
        let pending = self
            .lock()
            .feedback
            .clone()
            .ok_or(SessionError::NotLoaded("feedback"))?;
        let request = FeedbackRequest {
            message_id: pending.message_id,
            rating: form.rating,
            comment: form.comment.filter(|c| !c.trim().is_empty()),
            category: form.category.filter(|c| !c.trim().is_empty()),
        };

        let result = async {
            let token = self.ctx.token().await?;
            self.ctx
                .guard(self.ctx.backend().submit_feedback(&request, token.as_deref()))
                .await??;
            Ok::<_, SessionError>(())
        }
        .await;
        self.close_feedback();

        match result {
            Ok(()) => {
                self.ctx.notify(Notice::success("Thanks for your feedback!"));
                Ok(())
            }
            Err(error) => {
                self.ctx
                    .report_failure(&error, "Failed to submit feedback. Please try again.");
                Err(error)
            }
        }
    }

    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    pub fn close(&self) {
        self.ctx.cancel.cancel();
    }
}

impl<B, A> Drop for ChatPage<B, A> {
    fn drop(&mut self) {
        self.ctx.cancel.cancel();
    }
}
