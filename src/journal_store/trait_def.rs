//! JournalStore trait definition.

use super::models::{JournalEntry, LyricRecord, SongReference};
use crate::mood_store::MoodLevel;
use anyhow::Result;

/// Fields of a journal entry supplied by the caller; the store assigns the
/// identifier and deduplicates liked songs.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub mood_id: i64,
    pub mood_level: MoodLevel,
    pub text: String,
    pub liked_songs: Vec<SongReference>,
    pub memorable_lyrics: Vec<LyricRecord>,
    pub tags: Vec<String>,
}

/// Trait for journal storage backends.
pub trait JournalStore: Send + Sync {
    /// Append a new entry. Liked songs are deduplicated by song id with
    /// insertion order preserved. The referenced mood observation is
    /// resolved by the caller before appending.
    fn append(&self, entry: NewJournalEntry) -> Result<JournalEntry>;

    /// Exact lookup by identifier.
    fn find(&self, id: i64) -> Result<Option<JournalEntry>>;

    /// Entries with identifier in `[start, end)`, oldest first. Aggregation
    /// relies on this order for first-seen tie breaking.
    fn query(&self, start: i64, end: i64) -> Result<Vec<JournalEntry>>;
}
