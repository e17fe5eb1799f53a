//! Folder validation and audio file listing.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use drivecast_core::UpstreamError;
use serde::Serialize;
use tracing::debug;

use super::{TokenQuery, authorize};
use crate::error::ApiError;
use crate::server::AppState;

/// Result of checking a folder for playable audio.
#[derive(Debug, Serialize)]
pub struct FolderValidation {
    pub is_valid: bool,
    pub audio_count: usize,
    pub folder_name: String,
    pub error: Option<String>,
}

impl FolderValidation {
    fn invalid(error: &str) -> Self {
        Self {
            is_valid: false,
            audio_count: 0,
            folder_name: String::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Audio file entry as consumed by the browser player.
#[derive(Debug, Serialize)]
pub struct AudioFile {
    pub id: String,
    pub name: String,
    pub size: String,
    pub download_url: String,
    pub mime_type: String,
}

/// `GET /api/validate-folder/{folder_id}` - checks that a folder exists and
/// contains audio.
///
/// An unknown folder is reported in the body, not as an HTTP error, matching
/// the storage collaborator's semantics.
pub async fn validate_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<FolderValidation>, ApiError> {
    let credential = authorize(&state, &query.token)?;

    let folder_name = match state.provider.folder_name(&credential, &folder_id).await {
        Ok(name) => name,
        Err(UpstreamError::NotFound { .. }) => {
            return Ok(Json(FolderValidation::invalid("Folder not found")));
        }
        Err(e) => return Err(e.into()),
    };

    let files = state
        .provider
        .list_audio_files(&credential, &folder_id)
        .await?;
    let audio_count = files.len();
    debug!("Folder {folder_id} ('{folder_name}') holds {audio_count} audio files");

    Ok(Json(FolderValidation {
        is_valid: audio_count > 0,
        audio_count,
        folder_name,
        error: if audio_count > 0 {
            None
        } else {
            Some("No audio files found".to_string())
        },
    }))
}

/// `GET /api/audio-files/{folder_id}` - lists playable files with stream URLs.
pub async fn audio_files(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Vec<AudioFile>>, ApiError> {
    let credential = authorize(&state, &query.token)?;

    let files = state
        .provider
        .list_audio_files(&credential, &folder_id)
        .await?;

    let base = &state.config.server.public_url;
    let listing = files
        .into_iter()
        .map(|file| AudioFile {
            download_url: format!(
                "{base}/api/stream/{}?token={}",
                urlencoding::encode(&file.id),
                query.token
            ),
            id: file.id,
            name: file.name,
            size: format_size(file.size),
            mime_type: file.mime_type,
        })
        .collect();

    Ok(Json(listing))
}

/// Human-readable file size, 1024-based.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0B".to_string();
    }

    let exponent = ((64 - bytes.leading_zeros() as usize - 1) / 10).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    if exponent == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[exponent])
    }
}
