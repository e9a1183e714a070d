use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Capture loop cadence used when the config file does not override it
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Application configuration, loaded once at startup
///
/// Read from `config.json` in the user's config directory:
/// - Linux: ~/.config/qr-sentry/config.json
/// - macOS: ~/Library/Application Support/qr-sentry/config.json
/// - Windows: %APPDATA%\qr-sentry\config.json
///
/// A missing file yields the defaults; a malformed file is logged and
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the classification backend.
    /// Decoded payloads are sent as `GET {backend_url}/?exp=<payload>`.
    pub backend_url: String,

    /// Which capture device to open. Desktop stand-in for the original's
    /// rear-facing ("environment") camera preference.
    pub camera_index: u32,

    /// Milliseconds between capture ticks while scanning.
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            camera_index: 0,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Load the configuration, falling back to defaults when the file is
    /// absent or unreadable.
    pub fn load() -> Self {
        let path = Self::config_path();

        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => {
                    println!("⚙️  Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    eprintln!("⚠️  Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Get the path where the config file is expected
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("qr-sentry");
        path.push("config.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.camera_index, 0);
        assert!(!config.backend_url.is_empty());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "backend_url": "https://classify.example" }"#).unwrap();

        assert_eq!(config.backend_url, "https://classify.example");
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }
}
