use rag_auth::AuthError;
use rag_client::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no authenticated user")]
    NotAuthenticated,

    /// A prerequisite piece of page state has not been loaded yet.
    #[error("{0} not loaded")]
    NotLoaded(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The page view was closed before the operation could commit.
    #[error("page closed")]
    Cancelled,
}

impl SessionError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
