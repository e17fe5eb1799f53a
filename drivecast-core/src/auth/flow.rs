//! Delegated-authorization hand-off against the OAuth 2.0 endpoints.
//!
//! The core treats the authorization server as an opaque collaborator: build
//! a consent URL, trade the one-time code for a credential. Nothing here
//! implements the protocol beyond that exchange.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::warn;

use super::AuthError;
use super::credentials::Credential;
use crate::config::{OauthConfig, UpstreamConfig};

/// Collaborator interface for the authorization handshake.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// URL of the consent screen the browser is sent to.
    fn authorization_url(&self) -> String;

    /// Trades a one-time authorization code for an upstream credential.
    ///
    /// # Errors
    /// - `AuthError::Handshake` - Token endpoint rejected the code or was unreachable
    async fn exchange_code(&self, code: &str) -> Result<Credential, AuthError>;
}

/// Token-endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Google OAuth 2.0 implementation of the handshake.
pub struct GoogleAuthFlow {
    oauth: OauthConfig,
    client: reqwest::Client,
}

impl GoogleAuthFlow {
    /// Creates the flow with a bounded-timeout HTTP client.
    pub fn new(oauth: OauthConfig, upstream: &UpstreamConfig) -> Self {
        Self {
            oauth,
            client: reqwest::Client::builder()
                .connect_timeout(upstream.connect_timeout)
                .user_agent(upstream.user_agent)
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }
}

#[async_trait]
impl AuthorizationFlow for GoogleAuthFlow {
    fn authorization_url(&self) -> String {
        let scope = self.oauth.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
            self.oauth.auth_endpoint,
            urlencoding::encode(&self.oauth.client_id),
            urlencoding::encode(&self.oauth.redirect_uri),
            urlencoding::encode(&scope),
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<Credential, AuthError> {
        let params = [
            ("code", code),
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.oauth.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Handshake {
                reason: format!("token endpoint unreachable: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Token exchange rejected with status {status}");
            return Err(AuthError::Handshake {
                reason: format!("token endpoint returned {status}"),
            });
        }

        let token: TokenResponse =
            response.json().await.map_err(|e| AuthError::Handshake {
                reason: format!("malformed token response: {e}"),
            })?;

        Ok(Credential::new(
            token.access_token,
            token.refresh_token,
            Utc::now() + Duration::seconds(token.expires_in),
        ))
    }
}
