//! SQLite-backed journal implementation.

use super::models::{JournalEntry, LyricRecord, SongReference};
use super::schema::{CREATE_JOURNAL_SCHEMA, JOURNAL_SCHEMA_VERSION};
use super::trait_def::{JournalStore, NewJournalEntry};
use crate::mood_store::{now_ms, MoodLevel};
use anyhow::{Context, Result};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// SQLite-backed journal store.
#[derive(Clone)]
pub struct SqliteJournalStore {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version >= JOURNAL_SCHEMA_VERSION {
        return Ok(());
    }
    info!(
        "Creating journal schema at version {}",
        JOURNAL_SCHEMA_VERSION
    );
    conn.execute_batch(CREATE_JOURNAL_SCHEMA)?;
    conn.pragma_update(None, "user_version", JOURNAL_SCHEMA_VERSION)?;
    Ok(())
}

fn to_json<T: Serialize>(v: &T) -> String {
    serde_json::to_string(v).unwrap()
}

fn parse_json<T: DeserializeOwned + Default>(s: String) -> T {
    serde_json::from_str(&s).unwrap_or_else(|e| {
        warn!("Malformed JSON in journal db: {}: {}", s, e);
        T::default()
    })
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let rank: i64 = row.get(2)?;
    let mood_level = MoodLevel::from_rank(rank).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Integer,
            format!("invalid mood rank {}", rank).into(),
        )
    })?;
    Ok(JournalEntry {
        id: row.get(0)?,
        mood_id: row.get(1)?,
        mood_level,
        text: row.get(3)?,
        liked_songs: parse_json::<Vec<SongReference>>(row.get(4)?),
        memorable_lyrics: parse_json::<Vec<LyricRecord>>(row.get(5)?),
        tags: parse_json::<Vec<String>>(row.get(6)?),
    })
}

/// Drop repeated song ids, keeping the first occurrence of each.
fn dedup_songs(songs: Vec<SongReference>) -> Vec<SongReference> {
    let mut seen = HashSet::new();
    songs
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}

impl SqliteJournalStore {
    /// Create a new SqliteJournalStore.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open journal database")?;

        migrate_if_needed(&write_conn)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on journal write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open journal database for reading")?;

        read_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on journal read connection")?;

        let count: usize =
            read_conn.query_row("SELECT COUNT(*) FROM journal_entries", [], |r| r.get(0))?;
        info!("Journal store ready: {} entries", count);

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
        })
    }
}

impl JournalStore for SqliteJournalStore {
    fn append(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        let liked_songs = dedup_songs(entry.liked_songs);

        let conn = self.write_conn.lock().unwrap();
        let mut id = now_ms();
        loop {
            let result = conn.execute(
                "INSERT INTO journal_entries
                 (id, mood_id, mood_level, text, liked_songs, memorable_lyrics, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    entry.mood_id,
                    entry.mood_level.rank(),
                    entry.text,
                    to_json(&liked_songs),
                    to_json(&entry.memorable_lyrics),
                    to_json(&entry.tags),
                ],
            );
            match result {
                Ok(_) => break,
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    id += 1;
                }
                Err(e) => return Err(e).context("Failed to insert journal entry"),
            }
        }
        Ok(JournalEntry {
            id,
            mood_id: entry.mood_id,
            mood_level: entry.mood_level,
            text: entry.text,
            liked_songs,
            memorable_lyrics: entry.memorable_lyrics,
            tags: entry.tags,
        })
    }

    fn find(&self, id: i64) -> Result<Option<JournalEntry>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, mood_id, mood_level, text, liked_songs, memorable_lyrics, tags
             FROM journal_entries WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_entry).optional()?;
        Ok(result)
    }

    fn query(&self, start: i64, end: i64) -> Result<Vec<JournalEntry>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, mood_id, mood_level, text, liked_songs, memorable_lyrics, tags
             FROM journal_entries WHERE id >= ?1 AND id < ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![start, end], row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
