//! Configuration resolution: CLI arguments plus an optional TOML file,
//! with file values overriding CLI values where present.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default maximum journal text length, characters.
pub const DEFAULT_JOURNAL_MAX_TEXT_LEN: usize = 5000;
/// Default number of favorite songs in a monthly review.
pub const DEFAULT_TOP_SONGS_LIMIT: usize = 10;
/// Default timeout for provider API requests.
pub const DEFAULT_PROVIDER_TIMEOUT_SEC: u64 = 30;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub journal_max_text_len: Option<usize>,
    pub top_songs_limit: Option<usize>,

    /// Music provider selection and credentials. Without this section the
    /// server runs with playlist generation disabled.
    pub provider: Option<ProviderConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider to use: "spotify" or "apple_music".
    pub provider: String,
    pub timeout_sec: Option<u64>,
    pub spotify: Option<SpotifyConfig>,
    pub apple_music: Option<AppleMusicConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpotifyConfig {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppleMusicConfig {
    pub developer_token: String,
    pub music_user_token: String,
    /// Catalog storefront, e.g. "us".
    pub storefront: String,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// Fully resolved application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub journal_max_text_len: usize,
    pub top_songs_limit: usize,
    pub provider: Option<ProviderConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_provider_config() {
        let toml = r#"
            port = 4000
            journal_max_text_len = 2000

            [provider]
            provider = "spotify"
            timeout_sec = 10

            [provider.spotify]
            access_token = "token"
            user_id = "someone"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.port, Some(4000));
        assert_eq!(config.journal_max_text_len, Some(2000));
        let provider = config.provider.unwrap();
        assert_eq!(provider.provider, "spotify");
        assert_eq!(provider.timeout_sec, Some(10));
        assert_eq!(provider.spotify.unwrap().user_id, "someone");
    }

    #[test]
    fn empty_config_is_valid() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.port.is_none());
        assert!(config.provider.is_none());
    }
}
