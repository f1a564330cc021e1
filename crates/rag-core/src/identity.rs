use serde::{Deserialize, Serialize};

/// Authenticated user identity as seen by the page controllers.
///
/// Produced by `rag-auth` from the bearer token's claims. Carries no auth
/// logic; a controller only needs to know *who* is signed in to decide whether
/// a request may be issued at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Identity-provider user ID (JWT `sub` claim).
    pub user_id: String,
    /// Session ID (JWT `sid` claim), when the provider issues one.
    pub session_id: Option<String>,
}
