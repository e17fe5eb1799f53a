//! Google Drive v3 API client.

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{FileMetadata, RangeFetch, StorageProvider, UpstreamError};
use crate::auth::Credential;
use crate::config::UpstreamConfig;
use crate::streaming::ByteRange;

/// MIME types Drive reports for playable audio.
const AUDIO_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp4",
    "audio/x-m4a",
    "audio/aac",
    "audio/wav",
    "audio/flac",
    "audio/ogg",
];

/// Extension double-check applied on top of the MIME filter.
const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".m4a", ".aac", ".wav", ".flac", ".ogg"];

/// File resource as serialized by the Drive API.
///
/// Drive serializes `size` as a JSON string; folders and Google-native
/// documents omit it entirely.
#[derive(Debug, Deserialize)]
struct DriveFile {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(rename = "mimeType", default)]
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

impl DriveFile {
    fn into_metadata(self, file_id: &str) -> Result<FileMetadata, UpstreamError> {
        let size = match self.size {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| UpstreamError::InvalidMetadata {
                    reason: format!("unparseable size '{raw}' for file {file_id}"),
                })?,
            None => {
                return Err(UpstreamError::InvalidMetadata {
                    reason: format!("no size reported for file {file_id}"),
                });
            }
        };

        Ok(FileMetadata {
            id: if self.id.is_empty() {
                file_id.to_string()
            } else {
                self.id
            },
            name: self.name,
            size,
            mime_type: self.mime_type,
        })
    }
}

/// Whether a file name carries a recognized audio extension.
fn has_audio_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    AUDIO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Drive listing query: audio files directly under a folder, excluding trash.
fn audio_listing_query(folder_id: &str) -> String {
    let mime_conditions = AUDIO_MIME_TYPES
        .iter()
        .map(|mime| format!("mimeType='{mime}'"))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("'{folder_id}' in parents and ({mime_conditions}) and trashed=false")
}

/// HTTP client for the Google Drive v3 API.
pub struct GoogleDriveClient {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleDriveClient {
    /// Creates the client with a bounded connect timeout.
    ///
    /// Only the connection phase is bounded: a total-duration timeout would
    /// cut off long-running streams.
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .connect_timeout(config.connect_timeout)
                .user_agent(config.user_agent)
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }

    fn files_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.base_url, urlencoding::encode(file_id))
    }

    /// Maps a non-success Drive status onto the error taxonomy.
    fn status_error(status: StatusCode, id: &str) -> UpstreamError {
        if status == StatusCode::NOT_FOUND {
            UpstreamError::NotFound { id: id.to_string() }
        } else {
            UpstreamError::Status {
                status: status.as_u16(),
            }
        }
    }

    async fn fetch_file_fields(
        &self,
        credential: &Credential,
        file_id: &str,
        fields: &str,
    ) -> Result<DriveFile, UpstreamError> {
        let response = self
            .client
            .get(self.files_url(file_id))
            .query(&[("fields", fields)])
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, file_id));
        }

        Ok(response.json::<DriveFile>().await?)
    }
}

#[async_trait]
impl StorageProvider for GoogleDriveClient {
    async fn file_metadata(
        &self,
        credential: &Credential,
        file_id: &str,
    ) -> Result<FileMetadata, UpstreamError> {
        let file = self
            .fetch_file_fields(credential, file_id, "id,name,mimeType,size")
            .await?;
        file.into_metadata(file_id)
    }

    async fn folder_name(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<String, UpstreamError> {
        let file = self.fetch_file_fields(credential, folder_id, "name").await?;
        Ok(file.name)
    }

    async fn list_audio_files(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<Vec<FileMetadata>, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/files", self.base_url))
            .query(&[
                ("q", audio_listing_query(folder_id).as_str()),
                ("fields", "files(id,name,size,mimeType)"),
                ("orderBy", "name"),
                ("pageSize", "1000"),
            ])
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, folder_id));
        }

        let listing = response.json::<DriveFileList>().await?;
        debug!(
            "Drive listing for folder {folder_id}: {} candidates",
            listing.files.len()
        );

        let mut files = Vec::new();
        for file in listing.files {
            if !has_audio_extension(&file.name) {
                continue;
            }
            let id = file.id.clone();
            files.push(file.into_metadata(&id)?);
        }
        Ok(files)
    }

    async fn fetch_range(
        &self,
        credential: &Credential,
        file_id: &str,
        range: &ByteRange,
    ) -> Result<RangeFetch, UpstreamError> {
        let response = self
            .client
            .get(self.files_url(file_id))
            .query(&[("alt", "media")])
            .bearer_auth(&credential.access_token)
            .header("Range", range.header_value())
            .send()
            .await?;

        let status = response.status();
        let honored = match status {
            StatusCode::PARTIAL_CONTENT => true,
            StatusCode::OK => false,
            _ => return Err(Self::status_error(status, file_id)),
        };

        let body = Box::pin(response.bytes_stream().map_err(UpstreamError::Network));
        Ok(RangeFetch { honored, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_listing_query_shape() {
        let query = audio_listing_query("folder123");

        assert!(query.starts_with("'folder123' in parents and ("));
        assert!(query.ends_with(") and trashed=false"));
        assert!(query.contains("mimeType='audio/mpeg'"));
        assert!(query.contains("mimeType='audio/flac'"));
        assert!(query.contains(" or "));
    }

    #[test]
    fn test_audio_extension_filter() {
        assert!(has_audio_extension("Track 01.mp3"));
        assert!(has_audio_extension("TRACK.FLAC"));
        assert!(!has_audio_extension("cover.jpg"));
        assert!(!has_audio_extension("notes.txt"));
    }

    #[test]
    fn test_drive_file_deserialization() {
        let body = r#"{"id": "f1", "name": "song.mp3", "size": "4096", "mimeType": "audio/mpeg"}"#;
        let file: DriveFile = serde_json::from_str(body).unwrap();
        let metadata = file.into_metadata("f1").unwrap();

        assert_eq!(metadata.id, "f1");
        assert_eq!(metadata.name, "song.mp3");
        assert_eq!(metadata.size, 4096);
        assert_eq!(metadata.mime_type, "audio/mpeg");
    }

    #[test]
    fn test_metadata_without_size_is_rejected() {
        let body = r#"{"id": "f1", "name": "doc", "mimeType": "application/vnd.google-apps.document"}"#;
        let file: DriveFile = serde_json::from_str(body).unwrap();
        let result = file.into_metadata("f1");
        assert!(matches!(result, Err(UpstreamError::InvalidMetadata { .. })));
    }

    #[test]
    fn test_metadata_with_unparseable_size_is_rejected() {
        let body = r#"{"id": "f1", "name": "song.mp3", "size": "not-a-number", "mimeType": "audio/mpeg"}"#;
        let file: DriveFile = serde_json::from_str(body).unwrap();
        assert!(matches!(
            file.into_metadata("f1"),
            Err(UpstreamError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_file_list_deserialization_defaults() {
        let listing: DriveFileList = serde_json::from_str("{}").unwrap();
        assert!(listing.files.is_empty());
    }
}
