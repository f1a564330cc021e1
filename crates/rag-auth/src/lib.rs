//! # rag-auth
//!
//! Bearer-token handling for the Ragdesk client.
//!
//! Tokens are issued by an external identity provider; this crate only stores
//! them (OS keychain via `keyring`, `RAGDESK_AUTH__TOKEN`, or a credentials
//! file), decodes their claims to learn who is signed in, and hands a fresh
//! token to every request through the [`AuthProvider`] seam.

pub mod claims;
pub mod error;
pub mod provider;
pub mod token_store;

pub use claims::SessionClaims;
pub use error::AuthError;
pub use provider::{AuthProvider, StaticSession, StoredSession};

/// Persist a token obtained from the identity provider.
///
/// The token is decoded first so an obviously malformed value is rejected
/// before it reaches the keychain.
///
/// # Errors
///
/// Returns [`AuthError::MalformedToken`] if the JWT cannot be decoded, or
/// [`AuthError::TokenStoreError`] if no storage tier accepts it.
pub fn login(jwt: &str) -> Result<SessionClaims, AuthError> {
    let claims = SessionClaims::decode(jwt.trim())?;
    token_store::store(&claims.raw_jwt)?;
    Ok(claims)
}

/// Clear stored credentials.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn logout() -> Result<(), AuthError> {
    token_store::delete()
}
