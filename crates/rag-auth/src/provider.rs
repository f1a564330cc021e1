//! Identity and per-request token resolution.
//!
//! Controllers never hold a token: they ask an [`AuthProvider`] right before
//! each request, so a token refreshed in the keychain between two calls is
//! picked up without restarting the page.

use std::future::Future;

use rag_core::identity::AuthIdentity;

use crate::claims::SessionClaims;
use crate::error::AuthError;
use crate::token_store;

/// Seconds before expiry at which a stored token is no longer handed out.
const EXPIRY_BUFFER_SECS: i64 = 30;

pub trait AuthProvider: Send + Sync {
    /// Who is signed in, if anyone. No network access.
    fn identity(&self) -> Option<AuthIdentity>;

    /// A bearer token for the next request, or `None` for anonymous calls.
    fn token(&self) -> impl Future<Output = Result<Option<String>, AuthError>> + Send;
}

/// Provider backed by the token store (keyring → env → file).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredSession;

impl StoredSession {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decoded claims of the stored token together with the tier it came from.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nothing is stored, or
    /// `AuthError::MalformedToken` if the stored value is not a JWT.
    pub fn claims(&self) -> Result<(SessionClaims, token_store::TokenSource), AuthError> {
        let (jwt, source) = token_store::load().ok_or(AuthError::NotAuthenticated)?;
        Ok((SessionClaims::decode(&jwt)?, source))
    }
}

impl AuthProvider for StoredSession {
    fn identity(&self) -> Option<AuthIdentity> {
        match self.claims() {
            Ok((claims, _)) => Some(claims.to_identity()),
            Err(AuthError::NotAuthenticated) => None,
            Err(error) => {
                tracing::warn!(%error, "stored token is unusable");
                None
            }
        }
    }

    async fn token(&self) -> Result<Option<String>, AuthError> {
        let Some((jwt, source)) = token_store::load() else {
            return Ok(None);
        };
        let claims = SessionClaims::decode(&jwt)?;
        if claims.is_near_expiry(EXPIRY_BUFFER_SECS) {
            tracing::warn!(
                source = source.as_str(),
                expires_at = ?claims.expires_at,
                "stored token is expired or about to expire",
            );
            return Err(AuthError::TokenExpired);
        }
        Ok(Some(claims.raw_jwt))
    }
}

/// Fixed identity and token, for CI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    identity: Option<AuthIdentity>,
    token: Option<String>,
}

impl StaticSession {
    /// A signed-in session that sends `token` verbatim.
    #[must_use]
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identity: Some(AuthIdentity {
                user_id: user_id.into(),
                session_id: None,
            }),
            token: Some(token.into()),
        }
    }

    /// Nobody signed in; requests go out without a bearer header.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build from a JWT, taking the identity from its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedToken` if the JWT cannot be decoded.
    pub fn from_jwt(jwt: &str) -> Result<Self, AuthError> {
        let claims = SessionClaims::decode(jwt)?;
        Ok(Self {
            identity: Some(claims.to_identity()),
            token: Some(claims.raw_jwt),
        })
    }
}

impl AuthProvider for StaticSession {
    fn identity(&self) -> Option<AuthIdentity> {
        self.identity.clone()
    }

    async fn token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::make_jwt;

    #[tokio::test]
    async fn static_session_hands_out_its_token() {
        let session = StaticSession::new("user_1", "tok");
        assert_eq!(session.identity().unwrap().user_id, "user_1");
        assert_eq!(session.token().await.unwrap().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn anonymous_session_has_no_identity_or_token() {
        let session = StaticSession::anonymous();
        assert!(session.identity().is_none());
        assert!(session.token().await.unwrap().is_none());
    }

    #[test]
    fn from_jwt_uses_subject_claim() {
        let jwt = make_jwt(r#"{"sub":"user_jwt","sid":"s1"}"#);
        let session = StaticSession::from_jwt(&jwt).unwrap();
        let identity = session.identity().unwrap();
        assert_eq!(identity.user_id, "user_jwt");
        assert_eq!(identity.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn from_jwt_rejects_garbage() {
        assert!(StaticSession::from_jwt("garbage").is_err());
    }
}
