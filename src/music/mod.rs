//! Music provider integration.
//!
//! A `MusicService` turns a mood (plus the user's intent) into track
//! recommendations and creates playlists on the provider's side. One
//! implementation per provider, selected by explicit configuration.

mod apple_music;
mod factory;
pub mod mappings;
mod spotify;

pub use apple_music::AppleMusicService;
pub use factory::make_music_service;
pub use spotify::SpotifyService;

use crate::journal_store::SongReference;
use crate::mood_store::MoodLevel;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user's stated goal for a generated playlist: shift the mood upward,
/// or musically match the current mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Improve,
    Relate,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Improve => write!(f, "Improve"),
            Intent::Relate => write!(f, "Relate"),
        }
    }
}

/// Capability consumed from the music-streaming provider. All operations
/// are fallible with an opaque error the caller surfaces unchanged.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MusicService: Send + Sync {
    /// Recommend tracks for a mood and intent.
    async fn get_recommendations(
        &self,
        level: MoodLevel,
        intent: Intent,
    ) -> Result<Vec<SongReference>>;

    /// Create a playlist with the given tracks; returns the provider's
    /// playlist id.
    async fn create_playlist(&self, name: &str, track_ids: &[String]) -> Result<String>;

    /// Fetch canonical metadata for a single track.
    async fn get_track_info(&self, track_id: &str) -> Result<SongReference>;
}
