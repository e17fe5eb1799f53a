//! Axum server wiring: shared state, routes, and CORS.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use drivecast_core::auth::{AuthorizationFlow, CredentialStore, GoogleAuthFlow};
use drivecast_core::config::{CorsConfig, DrivecastConfig};
use drivecast_core::storage::{GoogleDriveClient, StorageProvider};
use drivecast_core::streaming::StreamingRelay;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::handlers::{
    auth_callback, auth_login, audio_files, health, root, stream_audio, validate_folder,
};

/// Shared state handed to every request handler.
///
/// The credential store is the only mutable state crossing requests; all
/// collaborators are injected behind trait objects so tests can substitute
/// them.
#[derive(Clone)]
pub struct AppState {
    pub config: DrivecastConfig,
    pub credentials: Arc<CredentialStore>,
    pub auth_flow: Arc<dyn AuthorizationFlow>,
    pub provider: Arc<dyn StorageProvider>,
    pub relay: Arc<StreamingRelay>,
}

impl AppState {
    /// Assembles state from explicit collaborators.
    pub fn new(
        config: DrivecastConfig,
        auth_flow: Arc<dyn AuthorizationFlow>,
        provider: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            config,
            credentials: Arc::new(CredentialStore::new()),
            relay: Arc::new(StreamingRelay::new(Arc::clone(&provider))),
            auth_flow,
            provider,
        }
    }

    /// Production wiring: Google OAuth and the Drive v3 client.
    pub fn production(config: DrivecastConfig) -> Self {
        let auth_flow = Arc::new(GoogleAuthFlow::new(
            config.oauth.clone(),
            &config.upstream,
        ));
        let provider = Arc::new(GoogleDriveClient::new(&config.upstream));
        Self::new(config, auth_flow, provider)
    }
}

/// CORS for the browser player: configured origins, any method and header,
/// with range metadata exposed so the audio element can read it.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_RANGE, header::CONTENT_LENGTH])
}

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", get(auth_login))
        .route("/auth/callback", get(auth_callback))
        .route("/api/validate-folder/{folder_id}", get(validate_folder))
        .route("/api/audio-files/{folder_id}", get(audio_files))
        .route("/api/stream/{file_id}", get(stream_audio))
        .layer(cors)
        .with_state(state)
}

/// Binds and serves the API until the process is stopped.
///
/// # Errors
/// Returns an error if the listen address cannot be bound.
pub async fn run_server(config: DrivecastConfig) -> Result<(), std::io::Error> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::production(config);
    let app = router(state);

    info!("Drivecast API server listening on http://{bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
