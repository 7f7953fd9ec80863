//! # Client configuration: `client.toml`
//!
//! Defines the TOML configuration file read by the client at start-up
//! (filename: [`ClientConfig::filename`] = `"client.toml"`). On native builds the file
//! lives in `<config_dir>/filedesk/`; the web build has no filesystem and runs
//! on defaults plus the build-time URL override.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! upload_timeout_secs = 60
//!
//! [ui]
//! notification_dismiss_ms = 3000   # success toast lifetime
//! progress_reset_ms = 1500         # delay before the progress bar resets
//! ```
//!
//! ## Overrides
//!
//! `FILEDESK_API_URL` replaces `api.base_url`. It is read at compile time for
//! every target and, on native targets, again at run time (run time wins).
//!
//! All structs derive `Default` with production defaults so that a missing or
//! empty config file is equivalent to the default configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "FILEDESK_API_URL";

/// Errors raised while reading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid client config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration stored in `client.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote service settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for a single upload request, in seconds.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

/// Timing of transient UI feedback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_notification_dismiss")]
    pub notification_dismiss_ms: u64,
    #[serde(default = "default_progress_reset")]
    pub progress_reset_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_upload_timeout() -> u64 {
    60
}

fn default_notification_dismiss() -> u64 {
    3000
}

fn default_progress_reset() -> u64 {
    1500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_dismiss_ms: default_notification_dismiss(),
            progress_reset_ms: default_progress_reset(),
        }
    }
}

impl ClientConfig {
    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "client.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml(&content)?)
    }

    /// Load the platform configuration, falling back to defaults, then apply
    /// the `FILEDESK_API_URL` override.
    pub fn load() -> Self {
        let mut config = Self::load_platform_file();
        if let Some(url) = option_env!("FILEDESK_API_URL") {
            config.api.base_url = url.to_string();
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(url) = std::env::var(API_URL_ENV) {
                config.api.base_url = url;
            }
        }
        config
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_platform_file() -> Self {
        let Some(dir) = dirs::config_dir() else {
            return Self::default();
        };
        let path = dir.join("filedesk").join(Self::filename());
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded client config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn load_platform_file() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.upload_timeout_secs, 60);
        assert_eq!(config.ui.notification_dismiss_ms, 3000);
        assert_eq!(config.ui.progress_reset_ms, 1500);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "https://files.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://files.example.com/api");
        assert_eq!(config.api.upload_timeout_secs, 60);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::default().with_base_url("http://10.0.0.2:9000/api");
        let text = config.to_toml().unwrap();
        assert!(text.contains("[api]"));
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("filedesk_no_such_dir").join("client.toml");
        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_rejects_bad_types() {
        let dir = std::env::temp_dir().join(format!("filedesk_config_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(ClientConfig::filename());
        std::fs::write(&path, "[api]\nupload_timeout_secs = \"soon\"\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
