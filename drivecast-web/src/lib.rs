//! Drivecast Web - HTTP API server
//!
//! Exposes the delegated-authorization hand-off, folder listing, and the
//! range-aware audio streaming proxy over axum.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, router, run_server};
