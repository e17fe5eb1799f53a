//! Session credentials and the delegated-authorization hand-off.
//!
//! Every API request carries an opaque session token minted after the OAuth
//! callback. The token maps to an upstream credential held in process memory
//! only; nothing is persisted and expired credentials force re-authorization.

mod credentials;
mod flow;
mod store;

pub use credentials::{Credential, SessionToken};
pub use flow::{AuthorizationFlow, GoogleAuthFlow};
pub use store::CredentialStore;

/// Authorization failures surfaced to the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session token not recognized")]
    UnknownToken,

    #[error("Credential expired; re-authorization required")]
    Expired,

    #[error("Authorization handshake failed: {reason}")]
    Handshake { reason: String },
}
