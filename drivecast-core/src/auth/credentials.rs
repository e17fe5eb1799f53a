//! Session tokens and upstream credentials.

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

/// Length of a generated session token in characters.
///
/// 43 alphanumeric characters carry ~256 bits of entropy, matching the
/// strength of a 32-byte URL-safe token.
const SESSION_TOKEN_LEN: usize = 43;

/// Opaque bearer token identifying a completed authorization handshake.
///
/// Generated once per authorization event and handed to the browser; the
/// server never derives anything from its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh URL-safe random token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let token: String = rng()
            .sample_iter(Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream access credential obtained from the authorization server.
///
/// Any use of a credential must first pass the expiry check; an expired
/// credential is good for no upstream call. The refresh token is carried to
/// mirror the token-endpoint response shape but is never consumed - expiry
/// forces the user back through the authorization handshake.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Whether the access token has passed its expiry timestamp.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let first = SessionToken::generate();
        let second = SessionToken::generate();

        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), SESSION_TOKEN_LEN);
        assert!(first.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_credential_expiry_check() {
        let live = Credential::new(
            "access".to_string(),
            None,
            Utc::now() + Duration::hours(1),
        );
        assert!(!live.is_expired());

        let expired = Credential::new(
            "access".to_string(),
            Some("refresh".to_string()),
            Utc::now() - Duration::seconds(1),
        );
        assert!(expired.is_expired());
    }
}
