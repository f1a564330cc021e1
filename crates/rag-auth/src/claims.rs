use base64::Engine as _;
use chrono::{DateTime, Utc};
use rag_core::identity::AuthIdentity;

/// Claims read from a bearer token's payload.
///
/// The signature is NOT verified here: the backend validates every token it
/// receives. The client only needs the subject (to know whether someone is
/// signed in) and the expiry (to avoid sending a token that is already dead).
#[derive(Debug, Clone)]
pub struct SessionClaims {
    /// Raw JWT string, sent as the bearer credential.
    pub raw_jwt: String,
    /// Identity-provider user ID (`sub` claim).
    pub user_id: String,
    /// Session ID (`sid` claim).
    pub session_id: Option<String>,
    /// Token expiration time (`exp` claim). `None` if the token never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedToken` if the JWT does not have three
    /// segments, the payload is not base64url JSON, the `sub` claim is missing,
    /// or `exp` is not a valid timestamp.
    pub fn decode(jwt: &str) -> Result<Self, crate::AuthError> {
        use crate::AuthError::MalformedToken;

        let parts: Vec<&str> = jwt.split('.').collect();
        if parts.len() != 3 {
            return Err(MalformedToken("invalid JWT format".into()));
        }
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| MalformedToken(format!("base64 decode failed: {e}")))?;
        let value: serde_json::Value = serde_json::from_slice(&payload)
            .map_err(|e| MalformedToken(format!("JSON parse failed: {e}")))?;

        let user_id = value["sub"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MalformedToken("missing sub claim".into()))?
            .to_string();
        let session_id = value["sid"].as_str().map(str::to_string);
        let expires_at = match value.get("exp") {
            None | Some(serde_json::Value::Null) => None,
            Some(exp) => {
                let secs = exp
                    .as_i64()
                    .ok_or_else(|| MalformedToken("exp claim is not an integer".into()))?;
                Some(
                    DateTime::from_timestamp(secs, 0)
                        .ok_or_else(|| MalformedToken("invalid exp timestamp".into()))?,
                )
            }
        };

        Ok(Self {
            raw_jwt: jwt.to_string(),
            user_id,
            session_id,
            expires_at,
        })
    }

    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
        }
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
            expires_at <= threshold
        })
    }
}

#[cfg(test)]
pub(crate) fn make_jwt(payload: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"RS256"}"#);
    let payload = engine.encode(payload);
    let signature = engine.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_subject_session_and_expiry() {
        let exp = Utc::now().timestamp() + 3600;
        let jwt = make_jwt(&format!(r#"{{"sub":"user_123","sid":"sess_9","exp":{exp}}}"#));
        let claims = SessionClaims::decode(&jwt).unwrap();
        assert_eq!(claims.user_id, "user_123");
        assert_eq!(claims.session_id.as_deref(), Some("sess_9"));
        assert_eq!(claims.expires_at.map(|d| d.timestamp()), Some(exp));
        assert!(!claims.is_near_expiry(60));
        assert_eq!(claims.to_identity().user_id, "user_123");
    }

    #[test]
    fn token_without_exp_never_nears_expiry() {
        let claims = SessionClaims::decode(&make_jwt(r#"{"sub":"user_1"}"#)).unwrap();
        assert!(claims.expires_at.is_none());
        assert!(!claims.is_near_expiry(60));
    }

    #[test]
    fn expired_token_is_near_expiry() {
        let exp = Utc::now().timestamp() - 10;
        let claims =
            SessionClaims::decode(&make_jwt(&format!(r#"{{"sub":"u","exp":{exp}}}"#))).unwrap();
        assert!(claims.is_near_expiry(0));
    }

    #[test]
    fn token_expiring_within_buffer_is_near_expiry() {
        let exp = Utc::now().timestamp() + 30;
        let claims =
            SessionClaims::decode(&make_jwt(&format!(r#"{{"sub":"u","exp":{exp}}}"#))).unwrap();
        assert!(claims.is_near_expiry(60));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = SessionClaims::decode("not-a-jwt").unwrap_err();
        assert!(err.to_string().contains("invalid JWT format"));
    }

    #[test]
    fn rejects_missing_subject() {
        let err = SessionClaims::decode(&make_jwt(r#"{"exp":1}"#)).unwrap_err();
        assert!(err.to_string().contains("missing sub claim"));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = SessionClaims::decode("header.!!!invalid!!!.signature").unwrap_err();
        assert!(err.to_string().contains("base64 decode failed"));
    }
}
