//! # Filesystem-backed token store
//!
//! [`FileStore`] keeps the bearer token in a single file so that native
//! builds stay logged in across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── token          # the raw token, no trailing newline
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStore::default_location`] uses [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/filedesk/` |
//! | Linux | `~/.local/share/filedesk/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\filedesk\` |

use std::path::PathBuf;

use crate::token::{TokenStore, TOKEN_KEY};

/// Filesystem-backed TokenStore for native builds.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Store rooted at the platform data directory (falls back to `./filedesk`).
    pub fn default_location() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("filedesk");
        Self::new(base)
    }

    fn token_path(&self) -> PathBuf {
        self.base.join(TOKEN_KEY)
    }
}

impl TokenStore for FileStore {
    fn load(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.token_path()).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("Failed to create token directory {}: {}", self.base.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.token_path(), token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(self.token_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove session token: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("filedesk_token_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let store = FileStore::new(dir.clone());
        assert!(store.load().is_none());

        store.save("persisted-token");

        // Re-open from same directory
        let reopened = FileStore::new(dir.clone());
        assert_eq!(reopened.load().as_deref(), Some("persisted-token"));

        reopened.clear();
        assert!(store.load().is_none());

        // Clearing twice is harmless
        store.clear();

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clear_survives_unremovable_token() {
        let dir = std::env::temp_dir().join(format!("filedesk_clear_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        // A directory where the token file belongs cannot be removed as a file
        std::fs::create_dir_all(dir.join(TOKEN_KEY)).unwrap();

        let store = FileStore::new(dir.clone());
        store.clear();
        assert!(store.load().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_blank_file_reads_as_absent() {
        let dir = std::env::temp_dir().join(format!("filedesk_blank_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TOKEN_KEY), "  \n").unwrap();

        let store = FileStore::new(dir.clone());
        assert!(store.load().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
