use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated: run `ragc auth login --token <jwt>`")]
    NotAuthenticated,

    #[error("token expired: run `ragc auth login` with a fresh token")]
    TokenExpired,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),
}
