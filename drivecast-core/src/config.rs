//! Centralized configuration for Drivecast.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Missing or unusable configuration detected at startup.
///
/// The process refuses to serve traffic when validation fails; configuration
/// is loaded once and never re-validated on the request path.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable not set: {name}")]
    MissingVar { name: &'static str },
}

/// Central configuration for all Drivecast components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct DrivecastConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub oauth: OauthConfig,
    pub cors: CorsConfig,
}

/// HTTP server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the API server to
    pub host: String,
    /// Port to bind the API server to
    pub port: u16,
    /// Externally reachable base URL, used when handing the browser links
    /// back to this server (stream URLs in folder listings)
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9527,
            public_url: "http://localhost:9527".to_string(),
        }
    }
}

/// Google Drive API communication configuration.
///
/// Controls the upstream base URL, connection timeout, and user agent for
/// all storage-service requests.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL for the Drive v3 API
    pub api_base_url: String,
    /// Connection timeout for upstream requests. A total-duration timeout is
    /// deliberately not applied: it would cut off long-running audio streams.
    pub connect_timeout: Duration,
    /// User agent for upstream requests
    pub user_agent: &'static str,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            connect_timeout: Duration::from_secs(15),
            user_agent: "drivecast/0.1.0",
        }
    }
}

/// Delegated-authorization (OAuth 2.0) endpoint configuration.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    /// OAuth client identifier
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Consent screen endpoint
    pub auth_endpoint: String,
    /// Code-for-token exchange endpoint
    pub token_endpoint: String,
    /// Callback URL registered with the authorization server
    pub redirect_uri: String,
    /// Requested scopes
    pub scopes: &'static [&'static str],
    /// Frontend base URL for post-authorization redirects
    pub frontend_url: String,
}

impl Default for OauthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_endpoint: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            redirect_uri: "http://localhost:9527/auth/callback".to_string(),
            scopes: &["https://www.googleapis.com/auth/drive.readonly"],
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl OauthConfig {
    /// URL the frontend lands on after a successful authorization.
    pub fn success_url(&self) -> String {
        format!("{}/auth/success", self.frontend_url)
    }

    /// URL the frontend lands on when authorization fails.
    pub fn error_url(&self) -> String {
        format!("{}/auth/error", self.frontend_url)
    }
}

/// CORS configuration for the browser player.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

impl DrivecastConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("DRIVECAST_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("DRIVECAST_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(public_url) = std::env::var("DRIVECAST_PUBLIC_URL") {
            config.server.public_url = public_url.trim_end_matches('/').to_string();
        }

        if let Ok(client_id) = std::env::var("GOOGLE_CLIENT_ID") {
            config.oauth.client_id = client_id;
        }

        if let Ok(client_secret) = std::env::var("GOOGLE_CLIENT_SECRET") {
            config.oauth.client_secret = client_secret;
        }

        if let Ok(redirect_uri) = std::env::var("DRIVECAST_REDIRECT_URI") {
            config.oauth.redirect_uri = redirect_uri;
        }

        if let Ok(frontend_url) = std::env::var("DRIVECAST_FRONTEND_URL") {
            config.oauth.frontend_url = frontend_url;
        }

        if let Ok(origins) = std::env::var("DRIVECAST_CORS_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        if let Ok(timeout) = std::env::var("DRIVECAST_UPSTREAM_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.upstream.connect_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Validates that required credentials are present.
    ///
    /// # Errors
    /// - `ConfigError::MissingVar` - OAuth client id or secret is not configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oauth.client_id.is_empty() {
            return Err(ConfigError::MissingVar {
                name: "GOOGLE_CLIENT_ID",
            });
        }
        if self.oauth.client_secret.is_empty() {
            return Err(ConfigError::MissingVar {
                name: "GOOGLE_CLIENT_SECRET",
            });
        }
        Ok(())
    }

    /// Creates a configuration suitable for tests: dummy credentials that
    /// pass validation without touching the environment.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.oauth.client_id = "test-client-id".to_string();
        config.oauth.client_secret = "test-client-secret".to_string();
        config
    }
}
