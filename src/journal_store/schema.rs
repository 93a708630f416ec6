//! SQLite schema for the journal database.

/// Schema version written to `PRAGMA user_version` after creation.
pub const JOURNAL_SCHEMA_VERSION: i64 = 1;

/// Journal entries, keyed by millisecond creation timestamp. `liked_songs`
/// and `memorable_lyrics` are JSON arrays of objects; `tags` is a JSON array
/// of strings. `mood_id` is a non-owning reference into the mood ledger,
/// which lives in a separate database file.
pub const CREATE_JOURNAL_SCHEMA: &str = "
CREATE TABLE journal_entries (
    id INTEGER PRIMARY KEY,
    mood_id INTEGER NOT NULL,
    mood_level INTEGER NOT NULL,
    text TEXT NOT NULL,
    liked_songs TEXT NOT NULL,
    memorable_lyrics TEXT NOT NULL,
    tags TEXT NOT NULL
);
CREATE INDEX idx_journal_mood_id ON journal_entries(mood_id);
";
