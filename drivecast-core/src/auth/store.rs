//! In-memory credential store keyed by session token.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::credentials::{Credential, SessionToken};

/// Concurrency-safe mapping from session token to upstream credential.
///
/// Entries live for the lifetime of the process; there is no eviction and no
/// revocation. This is a known limitation inherited from the reference
/// behavior - a restart is the only way to clear the map. The lock is a
/// synchronous `parking_lot::RwLock` whose guard is not `Send`, so it cannot
/// be held across an await point.
#[derive(Debug, Default)]
pub struct CredentialStore {
    credentials: RwLock<HashMap<SessionToken, Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the credential for a session token.
    pub fn put(&self, token: SessionToken, credential: Credential) {
        self.credentials.write().insert(token, credential);
    }

    /// Looks up the credential for a session token.
    pub fn get(&self, token: &SessionToken) -> Option<Credential> {
        self.credentials.read().get(token).cloned()
    }

    /// Number of live sessions, for diagnostics.
    pub fn len(&self) -> usize {
        self.credentials.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;

    fn credential(access_token: &str) -> Credential {
        Credential::new(
            access_token.to_string(),
            None,
            Utc::now() + Duration::hours(1),
        )
    }

    #[test]
    fn test_put_and_get() {
        let store = CredentialStore::new();
        let token = SessionToken::generate();

        assert!(store.get(&token).is_none());

        store.put(token.clone(), credential("abc"));
        let found = store.get(&token).unwrap();
        assert_eq!(found.access_token, "abc");
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let store = CredentialStore::new();
        let token = SessionToken::generate();

        store.put(token.clone(), credential("first"));
        store.put(token.clone(), credential("second"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&token).unwrap().access_token, "second");
    }

    #[test]
    fn test_distinct_tokens_are_isolated() {
        let store = CredentialStore::new();
        let alpha = SessionToken::generate();
        let beta = SessionToken::generate();

        store.put(alpha.clone(), credential("alpha"));
        store.put(beta.clone(), credential("beta"));

        assert_eq!(store.get(&alpha).unwrap().access_token, "alpha");
        assert_eq!(store.get(&beta).unwrap().access_token, "beta");
    }

    #[tokio::test]
    async fn test_concurrent_access_does_not_corrupt_map() {
        let store = Arc::new(CredentialStore::new());
        let mut handles = Vec::new();

        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let token = SessionToken::from(format!("token-{i}"));
                store.put(token.clone(), credential(&format!("access-{i}")));
                let found = store.get(&token).unwrap();
                assert_eq!(found.access_token, format!("access-{i}"));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 32);
    }
}
