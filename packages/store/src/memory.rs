use std::sync::{Arc, Mutex};

use crate::token::TokenStore;

/// In-memory TokenStore for testing and sessions that should not outlive the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let store = MemoryStore::new();

        // Initially empty
        assert!(store.load().is_none());

        store.save("abc");
        assert_eq!(store.load().as_deref(), Some("abc"));

        // Save replaces
        store.save("def");
        assert_eq!(store.load().as_deref(), Some("def"));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::with_token("shared");
        let other = store.clone();

        other.clear();
        assert!(store.load().is_none());
    }
}
