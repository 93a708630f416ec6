//! Apple Music API client.
//!
//! Apple Music has no tunable audio-feature recommendations, so moods map
//! to genre search terms instead. The developer and music-user tokens come
//! from configuration.

use super::mappings::genre_terms;
use super::{Intent, MusicService};
use crate::journal_store::SongReference;
use crate::mood_store::MoodLevel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const APPLE_MUSIC_API_BASE: &str = "https://api.music.apple.com/v1";
const PER_GENRE_LIMIT: usize = 10;
const RECOMMENDATIONS_LIMIT: usize = 20;

pub struct AppleMusicService {
    client: reqwest::Client,
    base_url: String,
    developer_token: String,
    music_user_token: String,
    storefront: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchResults {
    songs: Option<SongsContainer>,
}

#[derive(Deserialize)]
struct SongsContainer {
    data: Vec<AppleSong>,
}

#[derive(Deserialize)]
struct AppleSong {
    id: String,
    attributes: SongAttributes,
}

#[derive(Deserialize)]
struct SongAttributes {
    name: String,
    #[serde(rename = "artistName")]
    artist_name: String,
    url: String,
}

#[derive(Deserialize)]
struct LibraryPlaylistResponse {
    data: Vec<LibraryPlaylist>,
}

#[derive(Deserialize)]
struct LibraryPlaylist {
    id: String,
}

#[derive(Deserialize)]
struct SongLookupResponse {
    data: Vec<AppleSong>,
}

impl AppleSong {
    fn into_song(self) -> SongReference {
        SongReference {
            id: self.id,
            name: self.attributes.name,
            artist: self.attributes.artist_name,
            url: self.attributes.url,
        }
    }
}

impl AppleMusicService {
    pub fn new(
        developer_token: &str,
        music_user_token: &str,
        storefront: &str,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;
        Ok(Self {
            client,
            base_url: APPLE_MUSIC_API_BASE.to_string(),
            developer_token: developer_token.to_string(),
            music_user_token: music_user_token.to_string(),
            storefront: storefront.to_string(),
        })
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.developer_token)
            .header("Music-User-Token", &self.music_user_token)
    }
}

#[async_trait]
impl MusicService for AppleMusicService {
    async fn get_recommendations(
        &self,
        level: MoodLevel,
        _intent: Intent,
    ) -> Result<Vec<SongReference>> {
        let mut songs = Vec::new();
        for term in genre_terms(level) {
            let url = format!(
                "{}/catalog/{}/search?types=songs&term={}&limit={}",
                self.base_url,
                self.storefront,
                urlencoding::encode(term),
                PER_GENRE_LIMIT,
            );
            let response = self
                .authed(self.client.get(&url))
                .send()
                .await
                .context("Failed to reach Apple Music search")?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "Apple Music search for '{}' failed with status {}",
                    term,
                    response.status()
                );
            }

            let body: SearchResponse = response
                .json()
                .await
                .context("Failed to parse Apple Music search response")?;

            if let Some(container) = body.results.songs {
                songs.extend(container.data.into_iter().map(AppleSong::into_song));
            }
        }
        songs.truncate(RECOMMENDATIONS_LIMIT);
        Ok(songs)
    }

    async fn create_playlist(&self, name: &str, track_ids: &[String]) -> Result<String> {
        let tracks: Vec<serde_json::Value> = track_ids
            .iter()
            .map(|id| json!({ "id": id, "type": "songs" }))
            .collect();

        let url = format!("{}/me/library/playlists", self.base_url);
        let response = self
            .authed(self.client.post(&url))
            .json(&json!({
                "attributes": {
                    "name": name,
                    "description": format!("Created by Moodify for {}", name),
                },
                "relationships": {
                    "tracks": { "data": tracks },
                },
            }))
            .send()
            .await
            .context("Failed to reach Apple Music playlist creation")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Apple Music playlist creation failed with status {}",
                response.status()
            );
        }

        let body: LibraryPlaylistResponse = response
            .json()
            .await
            .context("Failed to parse Apple Music playlist response")?;

        body.data
            .into_iter()
            .next()
            .map(|p| p.id)
            .context("Apple Music playlist response contained no playlist")
    }

    async fn get_track_info(&self, track_id: &str) -> Result<SongReference> {
        let url = format!(
            "{}/catalog/{}/songs/{}",
            self.base_url, self.storefront, track_id
        );
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .context("Failed to reach Apple Music song lookup")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Apple Music song lookup for {} failed with status {}",
                track_id,
                response.status()
            );
        }

        let body: SongLookupResponse = response
            .json()
            .await
            .context("Failed to parse Apple Music song response")?;

        body.data
            .into_iter()
            .next()
            .map(AppleSong::into_song)
            .with_context(|| format!("Apple Music returned no song for {}", track_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_maps_to_song_references() {
        let raw = r#"{
            "results": {
                "songs": {
                    "data": [{
                        "id": "900032829",
                        "attributes": {
                            "name": "Intro",
                            "artistName": "The xx",
                            "url": "https://music.apple.com/us/album/intro/900032785"
                        }
                    }]
                }
            }
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        let songs: Vec<SongReference> = body
            .results
            .songs
            .unwrap()
            .data
            .into_iter()
            .map(AppleSong::into_song)
            .collect();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "900032829");
        assert_eq!(songs[0].artist, "The xx");
    }

    #[test]
    fn empty_search_results_parse() {
        let body: SearchResponse = serde_json::from_str(r#"{"results": {}}"#).unwrap();
        assert!(body.results.songs.is_none());
    }
}
