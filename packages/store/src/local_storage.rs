//! # localStorage token store: browser-side persistence
//!
//! [`LocalStorageStore`] is the [`TokenStore`] used on the **web platform**. It
//! reads and writes `window.localStorage["token"]`, the same key the server's
//! reference frontend uses, so a token issued to either client is picked up by
//! the other.
//!
//! The struct is zero-sized and looks up `window.localStorage` on every call;
//! the browser caches the storage object. All failures (no window, storage
//! disabled, quota exceeded) are swallowed and read back as "no token".

use crate::token::{TokenStore, TOKEN_KEY};

/// `window.localStorage`-backed TokenStore for the web platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_KEY).ok().flatten()
    }

    fn save(&self, token: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable, session token not persisted");
            return;
        };
        if storage.set_item(TOKEN_KEY, token).is_err() {
            tracing::warn!("Failed to write session token to localStorage");
        }
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable, session token not cleared");
            return;
        };
        if storage.remove_item(TOKEN_KEY).is_err() {
            tracing::warn!("Failed to remove session token from localStorage");
        }
    }
}
