//! Data models for the journal database.

use crate::mood_store::MoodLevel;
use serde::{Deserialize, Serialize};

/// A provider track embedded read-only into journal entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongReference {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub url: String,
}

/// Memorable lyrics captured during a journaling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricRecord {
    pub text: String,
    pub song: String,
    pub artist: Option<String>,
    pub captured_at: i64,
}

/// A journal entry linked to exactly one mood observation.
///
/// `mood_level` is a snapshot of the referenced observation's level taken at
/// append time, so review aggregation does not need ledger lookups.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub mood_id: i64,
    pub mood_level: MoodLevel,
    pub text: String,
    pub liked_songs: Vec<SongReference>,
    pub memorable_lyrics: Vec<LyricRecord>,
    pub tags: Vec<String>,
}
