//! Citation viewer: one cited chunk and its detail pane.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rag_auth::AuthProvider;
use rag_client::RagApi;
use rag_core::entities::Chunk;

use crate::Session;
use crate::context::PageContext;
use crate::error::SessionError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationSnapshot {
    pub chunk: Option<Chunk>,
    pub loading: bool,
}

impl CitationSnapshot {
    /// Detail pane for the current chunk, if any.
    #[must_use]
    pub fn detail(&self) -> Option<ChunkDetail> {
        self.chunk
            .as_ref()
            .map(|chunk| ChunkDetail::new(chunk, !self.loading))
    }
}

/// Derived facts about a chunk for the inspector pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDetail {
    pub kinds: Vec<String>,
    pub page_number: Option<u32>,
    pub char_count: u64,
    pub word_count: usize,
    pub processing_complete: bool,
}

impl ChunkDetail {
    #[must_use]
    pub fn new(chunk: &Chunk, processing_complete: bool) -> Self {
        Self {
            kinds: chunk.kinds.clone(),
            page_number: chunk.page_number,
            char_count: chunk.char_count,
            word_count: chunk.word_count(),
            processing_complete,
        }
    }
}

#[derive(Default)]
struct ViewerState {
    view: CitationSnapshot,
    // Only the latest open() may commit.
    generation: u64,
}

pub struct CitationViewer<B, A> {
    ctx: PageContext<B, A>,
    project_id: String,
    state: Mutex<ViewerState>,
}

impl<B: RagApi, A: AuthProvider> CitationViewer<B, A> {
    pub(crate) fn new(session: Session<B, A>, project_id: String) -> Self {
        Self {
            ctx: PageContext::new(session),
            project_id,
            state: Mutex::new(ViewerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> CitationSnapshot {
        self.lock().view.clone()
    }

    /// Show the chunk a citation points at. With either id missing the
    /// viewer is cleared instead. A failed fetch is logged and leaves no
    /// chunk.
    ///
    /// # Errors
    ///
    /// The request error, or [`SessionError::Cancelled`].
    pub async fn open(
        &self,
        document_id: Option<&str>,
        chunk_id: Option<&str>,
    ) -> Result<Option<Chunk>, SessionError> {
        let ids = document_id
            .filter(|id| !id.is_empty())
            .zip(chunk_id.filter(|id| !id.is_empty()));
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.view.chunk = None;
            state.view.loading = ids.is_some();
            state.generation
        };
        let Some((document_id, chunk_id)) = ids else {
            return Ok(None);
        };

        let result = async {
            let token = self.ctx.token().await?;
            Ok::<_, SessionError>(
                self.ctx
                    .guard(self.ctx.backend().get_chunk(
                        &self.project_id,
                        document_id,
                        chunk_id,
                        token.as_deref(),
                    ))
                    .await??,
            )
        }
        .await;

        let mut state = self.lock();
        let current = state.generation == generation;
        if current {
            state.view.loading = false;
        }
        match result {
            Ok(chunk) => {
                if current && !self.ctx.cancel.is_cancelled() {
                    state.view.chunk = Some(chunk.clone());
                }
                Ok(Some(chunk))
            }
            Err(error) => {
                tracing::warn!(%error, document_id, chunk_id, "failed to fetch chunk");
                Err(error)
            }
        }
    }

    pub fn close(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.view = CitationSnapshot::default();
    }
}

impl<B, A> Drop for CitationViewer<B, A> {
    fn drop(&mut self) {
        self.ctx.cancel.cancel();
    }
}
