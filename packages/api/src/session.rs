//! Explicit session handle shared by the API client and the UI.

use std::sync::Arc;

use store::TokenStore;

/// The authenticated session, backed by a persistent [`TokenStore`].
///
/// Cloning is cheap and every clone sees the same token. The session is
/// started by a successful login and ended by logout or by the server
/// rejecting the token.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The bearer token, if a session is active.
    pub fn token(&self) -> Option<String> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Start a session with a freshly issued token.
    pub fn begin(&self, token: &str) {
        self.store.save(token);
    }

    /// End the session. Safe to call when no session is active.
    pub fn end(&self) {
        self.store.clear();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
