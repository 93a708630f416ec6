//! Spotify Web API client.
//!
//! Token acquisition is out of scope; the access token and user id come
//! from configuration.

use super::mappings::audio_targets;
use super::{Intent, MusicService};
use crate::journal_store::SongReference;
use crate::mood_store::MoodLevel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const RECOMMENDATIONS_LIMIT: usize = 20;

pub struct SpotifyService {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    user_id: String,
}

#[derive(Deserialize)]
struct RecommendationsResponse {
    tracks: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    artists: Vec<SpotifyArtist>,
    external_urls: ExternalUrls,
}

#[derive(Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Deserialize)]
struct CreatePlaylistResponse {
    id: String,
}

impl SpotifyTrack {
    fn into_song(self) -> SongReference {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        SongReference {
            url: self.external_urls.spotify.unwrap_or_default(),
            id: self.id,
            name: self.name,
            artist,
        }
    }
}

fn to_track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{}", track_id)
    }
}

impl SpotifyService {
    pub fn new(access_token: &str, user_id: &str, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;
        Ok(Self {
            client,
            base_url: SPOTIFY_API_BASE.to_string(),
            access_token: access_token.to_string(),
            user_id: user_id.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MusicService for SpotifyService {
    async fn get_recommendations(
        &self,
        level: MoodLevel,
        intent: Intent,
    ) -> Result<Vec<SongReference>> {
        let targets = audio_targets(level, intent);
        let url = format!(
            "{}/recommendations?seed_genres=pop,rock&target_valence={}&target_energy={}&min_tempo={}&max_tempo={}&limit={}",
            self.base_url,
            targets.valence,
            targets.energy,
            targets.tempo.0,
            targets.tempo.1,
            RECOMMENDATIONS_LIMIT,
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to reach Spotify recommendations")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spotify recommendations failed with status {}",
                response.status()
            );
        }

        let body: RecommendationsResponse = response
            .json()
            .await
            .context("Failed to parse Spotify recommendations response")?;

        Ok(body.tracks.into_iter().map(SpotifyTrack::into_song).collect())
    }

    async fn create_playlist(&self, name: &str, track_ids: &[String]) -> Result<String> {
        let url = format!("{}/users/{}/playlists", self.base_url, self.user_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({
                "name": name,
                "public": false,
                "description": format!("Created by Moodify for {}", name),
            }))
            .send()
            .await
            .context("Failed to reach Spotify playlist creation")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spotify playlist creation failed with status {}",
                response.status()
            );
        }

        let playlist: CreatePlaylistResponse = response
            .json()
            .await
            .context("Failed to parse Spotify playlist response")?;

        if !track_ids.is_empty() {
            let uris: Vec<String> = track_ids.iter().map(|id| to_track_uri(id)).collect();
            let url = format!("{}/playlists/{}/tracks", self.base_url, playlist.id);
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&json!({ "uris": uris }))
                .send()
                .await
                .context("Failed to add tracks to Spotify playlist")?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "Adding tracks to Spotify playlist failed with status {}",
                    response.status()
                );
            }
        }

        Ok(playlist.id)
    }

    async fn get_track_info(&self, track_id: &str) -> Result<SongReference> {
        let url = format!("{}/tracks/{}", self.base_url, track_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to reach Spotify track lookup")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spotify track lookup for {} failed with status {}",
                track_id,
                response.status()
            );
        }

        let track: SpotifyTrack = response
            .json()
            .await
            .context("Failed to parse Spotify track response")?;
        Ok(track.into_song())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_uri_building() {
        assert_eq!(to_track_uri("abc123"), "spotify:track:abc123");
        assert_eq!(to_track_uri("spotify:track:abc123"), "spotify:track:abc123");
    }

    #[test]
    fn track_response_maps_to_song_reference() {
        let raw = r#"{
            "id": "11dFghVXANMlKmJXsNCbNl",
            "name": "Cut To The Feeling",
            "artists": [{"name": "Carly Rae Jepsen"}, {"name": "Other"}],
            "external_urls": {"spotify": "https://open.spotify.com/track/11dFghVXANMlKmJXsNCbNl"}
        }"#;
        let track: SpotifyTrack = serde_json::from_str(raw).unwrap();
        let song = track.into_song();
        assert_eq!(song.id, "11dFghVXANMlKmJXsNCbNl");
        assert_eq!(song.artist, "Carly Rae Jepsen");
        assert!(song.url.starts_with("https://open.spotify.com/"));
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let service = SpotifyService::new("token", "user", 30)
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(service.base_url, "http://localhost:9999");
    }
}
