//! Upstream file-storage access.
//!
//! `StorageProvider` is the seam between the streaming core and the concrete
//! storage service. The production implementation talks to the Google Drive
//! v3 API; tests substitute mock providers.

mod drive;

use async_trait::async_trait;

pub use drive::GoogleDriveClient;

use crate::auth::Credential;
use crate::streaming::{ByteRange, ByteStream};

/// Failures talking to the storage service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream returned status {status}")]
    Status { status: u16 },

    #[error("File or folder not found: {id}")]
    NotFound { id: String },

    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream stream ended after {received} of {expected} bytes")]
    Truncated { received: u64, expected: u64 },

    #[error("Invalid upstream metadata: {reason}")]
    InvalidMetadata { reason: String },
}

/// File metadata fetched fresh from the storage service per request.
///
/// Never cached: size and type can change between requests and each fetch
/// re-validates the credential against the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// An opened upstream partial fetch.
///
/// `honored` is false when the upstream ignored the `Range` header and
/// answered 200 with the whole file; the relay re-slices such bodies.
pub struct RangeFetch {
    pub honored: bool,
    pub body: ByteStream,
}

/// Collaborator interface to the remote file-storage service.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Resolves name, size, and MIME type for a file.
    ///
    /// # Errors
    /// - `UpstreamError::NotFound` - Unknown file id
    /// - `UpstreamError::Status` - Upstream rejected the request
    async fn file_metadata(
        &self,
        credential: &Credential,
        file_id: &str,
    ) -> Result<FileMetadata, UpstreamError>;

    /// Resolves the display name of a folder.
    async fn folder_name(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<String, UpstreamError>;

    /// Lists audio files in a folder, ordered by name.
    async fn list_audio_files(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<Vec<FileMetadata>, UpstreamError>;

    /// Opens an authenticated partial fetch of a file's bytes.
    ///
    /// # Errors
    /// - `UpstreamError::Status` - Upstream answered with anything other than 200 or 206
    async fn fetch_range(
        &self,
        credential: &Credential,
        file_id: &str,
        range: &ByteRange,
    ) -> Result<RangeFetch, UpstreamError>;
}
