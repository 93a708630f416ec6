//! SQLite schema for the mood ledger database.

/// Schema version written to `PRAGMA user_version` after creation.
pub const MOOD_SCHEMA_VERSION: i64 = 1;

/// Mood observations, keyed by their millisecond creation timestamp.
/// `activities` and `tags` are JSON arrays stored as TEXT.
pub const CREATE_MOOD_SCHEMA: &str = "
CREATE TABLE moods (
    id INTEGER PRIMARY KEY,
    level INTEGER NOT NULL,
    context TEXT,
    activities TEXT NOT NULL,
    tags TEXT NOT NULL,
    playlist_id TEXT
);
CREATE INDEX idx_moods_level ON moods(level);
";
