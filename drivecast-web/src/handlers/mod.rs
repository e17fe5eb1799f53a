//! API request handlers.

pub mod auth;
pub mod library;
pub mod response;
pub mod streaming;

use axum::Json;
use drivecast_core::{AuthError, Credential, SessionToken};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::server::AppState;

pub use auth::{auth_callback, auth_login};
pub use library::{audio_files, validate_folder};
pub use streaming::stream_audio;

/// Session token carried as a query parameter on API routes.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Resolves a session token to a live credential.
///
/// The expiry check happens here, before any upstream call is attempted.
///
/// # Errors
/// - `AuthError::UnknownToken` - Token missing from the credential store
/// - `AuthError::Expired` - Stored credential has passed its expiry
pub(crate) fn authorize(state: &AppState, token: &str) -> Result<Credential, ApiError> {
    let token = SessionToken::from(token);
    let credential = state
        .credentials
        .get(&token)
        .ok_or(AuthError::UnknownToken)?;

    if credential.is_expired() {
        return Err(AuthError::Expired.into());
    }

    Ok(credential)
}

/// Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Drivecast Audio Player API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
