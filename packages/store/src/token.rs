//! # Token store: where the bearer token lives between page loads
//!
//! The client keeps exactly one piece of persistent state: the opaque bearer
//! token handed out by the login endpoint. [`TokenStore`] abstracts over where
//! that token is kept so the session logic in the `api` crate stays identical
//! across platforms.
//!
//! | Backend | Platform | Location |
//! |---------|----------|----------|
//! | [`crate::MemoryStore`] | tests, ephemeral sessions | process memory |
//! | [`crate::FileStore`] | native | `<data_dir>/filedesk/token` |
//! | `LocalStorageStore` | web (`web` feature) | `window.localStorage["token"]` |
//!
//! Backends never fail loudly. A storage error degrades to "no token", which
//! the UI treats as logged out.

/// Key under which the token is stored by key/value backends.
pub const TOKEN_KEY: &str = "token";

/// Persistent storage for the session's bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replace the stored token.
    fn save(&self, token: &str);

    /// Remove the stored token.
    fn clear(&self);
}
