use rag_auth::{AuthError, StoredSession};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize, Default)]
struct AuthStatusResponse {
    authenticated: bool,
    user_id: Option<String>,
    session_id: Option<String>,
    expires_at: Option<String>,
    expired: bool,
    token_source: Option<&'static str>,
    note: Option<String>,
}

pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = match StoredSession::new().claims() {
        Ok((claims, source)) => {
            let expired = claims.is_near_expiry(0);
            AuthStatusResponse {
                authenticated: !expired,
                user_id: Some(claims.user_id),
                session_id: claims.session_id,
                expires_at: claims.expires_at.map(|at| at.to_rfc3339()),
                expired,
                token_source: Some(source.as_str()),
                note: expired.then(|| AuthError::TokenExpired.to_string()),
            }
        }
        Err(AuthError::NotAuthenticated) => AuthStatusResponse {
            note: Some("no stored token".into()),
            ..AuthStatusResponse::default()
        },
        Err(error) => AuthStatusResponse {
            note: Some(error.to_string()),
            ..AuthStatusResponse::default()
        },
    };

    output(&status, flags.format)
}
