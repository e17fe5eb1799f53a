//! Drivecast Core - Credential handling and range-aware streaming
//!
//! This crate provides the building blocks for proxying audio files out of
//! Google Drive to a browser player: session credential storage, the
//! delegated-authorization hand-off, upstream metadata resolution, and the
//! streaming relay with byte-range support.

pub mod auth;
pub mod config;
pub mod storage;
pub mod streaming;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use auth::{AuthError, AuthorizationFlow, Credential, CredentialStore, SessionToken};
pub use config::DrivecastConfig;
pub use storage::{FileMetadata, StorageProvider, UpstreamError};
pub use streaming::{ByteRange, ByteStream, RangeError, StreamingRelay};

/// Core errors that can bubble up from any Drivecast subsystem.
#[derive(Debug, thiserror::Error)]
pub enum DrivecastError {
    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DrivecastError>;
