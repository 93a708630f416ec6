//! MoodStore trait definition.

use super::models::{MoodLevel, MoodObservation};
use anyhow::Result;

/// Fields of a mood observation supplied by the caller; the store assigns
/// the identifier.
#[derive(Debug, Clone)]
pub struct NewMood {
    pub level: MoodLevel,
    pub context: Option<String>,
    pub activities: Vec<String>,
    pub tags: Vec<String>,
}

/// Filter for range queries over the ledger.
#[derive(Debug, Clone, Default)]
pub struct MoodQuery {
    /// Inclusive lower bound, milliseconds.
    pub start: i64,
    /// Exclusive upper bound; defaults to "now" when absent.
    pub end: Option<i64>,
    /// Exact level match.
    pub level: Option<MoodLevel>,
    /// Keep entries sharing at least one of these tags. Empty means no
    /// tag filtering.
    pub tags: Vec<String>,
}

/// Trait for mood ledger storage backends.
pub trait MoodStore: Send + Sync {
    /// Append a new observation. The returned observation carries a unique,
    /// monotonically increasing millisecond-timestamp identifier.
    fn record(&self, mood: NewMood) -> Result<MoodObservation>;

    /// Exact lookup by identifier.
    fn find(&self, id: i64) -> Result<Option<MoodObservation>>;

    /// Observations with identifier in `[start, end)`, newest first.
    fn query(&self, query: &MoodQuery) -> Result<Vec<MoodObservation>>;

    /// Link a generated playlist to an observation. The reference is
    /// set-once: returns false when the observation is missing or already
    /// carries a playlist.
    fn set_playlist(&self, id: i64, playlist_id: &str) -> Result<bool>;
}
