//! Provider selection from explicit configuration.

use super::{AppleMusicService, MusicService, SpotifyService};
use crate::config::{ProviderConfig, DEFAULT_PROVIDER_TIMEOUT_SEC};
use anyhow::{bail, Context, Result};
use std::sync::Arc;

/// Build the configured music service. Fails when the named provider's
/// credentials section is missing or the provider is unknown.
pub fn make_music_service(config: &ProviderConfig) -> Result<Arc<dyn MusicService>> {
    let timeout_sec = config.timeout_sec.unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SEC);
    match config.provider.as_str() {
        "spotify" => {
            let spotify = config
                .spotify
                .as_ref()
                .context("provider is 'spotify' but [provider.spotify] is missing")?;
            Ok(Arc::new(SpotifyService::new(
                &spotify.access_token,
                &spotify.user_id,
                timeout_sec,
            )?))
        }
        "apple_music" => {
            let apple = config
                .apple_music
                .as_ref()
                .context("provider is 'apple_music' but [provider.apple_music] is missing")?;
            Ok(Arc::new(AppleMusicService::new(
                &apple.developer_token,
                &apple.music_user_token,
                &apple.storefront,
                timeout_sec,
            )?))
        }
        other => bail!(
            "unknown music provider '{}', expected 'spotify' or 'apple_music'",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotifyConfig;

    fn spotify_config() -> ProviderConfig {
        ProviderConfig {
            provider: "spotify".to_string(),
            timeout_sec: None,
            spotify: Some(SpotifyConfig {
                access_token: "token".to_string(),
                user_id: "someone".to_string(),
            }),
            apple_music: None,
        }
    }

    #[test]
    fn builds_spotify_service() {
        assert!(make_music_service(&spotify_config()).is_ok());
    }

    #[test]
    fn rejects_missing_credentials_section() {
        let mut config = spotify_config();
        config.spotify = None;
        assert!(make_music_service(&config).is_err());
    }

    #[test]
    fn rejects_unknown_provider() {
        let mut config = spotify_config();
        config.provider = "tidal".to_string();
        let err = make_music_service(&config).err().unwrap();
        assert!(err.to_string().contains("unknown music provider"));
    }
}
