//! Delegated-authorization hand-off endpoints.
//!
//! `/auth/login` sends the browser to the consent screen; `/auth/callback`
//! trades the one-time code for a credential, mints a session token, and
//! bounces the browser back to the frontend with the token in the query
//! string. Handshake failures redirect to the frontend error page rather
//! than answering with an HTTP error, since the browser is mid-navigation.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Response, header};
use axum::response::{IntoResponse, Json, Redirect};
use drivecast_core::SessionToken;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::server::AppState;

/// Starts the authorization hand-off.
///
/// Browsers navigating here directly get a redirect to the consent screen;
/// API callers sending `Accept: application/json` get the URL in a body so
/// the frontend can open it itself.
pub async fn auth_login(State(state): State<AppState>, headers: HeaderMap) -> Response<Body> {
    let auth_url = state.auth_flow.authorization_url();

    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json {
        Json(json!({ "auth_url": auth_url })).into_response()
    } else {
        Redirect::temporary(&auth_url).into_response()
    }
}

/// Query parameters delivered by the authorization server.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Completes the authorization hand-off.
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let oauth = &state.config.oauth;

    let Some(code) = query.code else {
        return Redirect::temporary(&format!("{}?error=no_code", oauth.error_url()));
    };

    match state.auth_flow.exchange_code(&code).await {
        Ok(credential) => {
            let token = SessionToken::generate();
            state.credentials.put(token.clone(), credential);
            info!("Authorization completed; {} live sessions", state.credentials.len());
            Redirect::temporary(&format!("{}?token={token}", oauth.success_url()))
        }
        Err(e) => {
            error!("Authorization handshake failed: {e}");
            Redirect::temporary(&format!(
                "{}?error={}",
                oauth.error_url(),
                urlencoding::encode(&e.to_string())
            ))
        }
    }
}
