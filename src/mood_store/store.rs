//! SQLite-backed mood ledger implementation.

use super::models::{MoodLevel, MoodObservation};
use super::schema::{CREATE_MOOD_SCHEMA, MOOD_SCHEMA_VERSION};
use super::trait_def::{MoodQuery, MoodStore, NewMood};
use super::now_ms;
use anyhow::{Context, Result};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// SQLite-backed mood ledger.
#[derive(Clone)]
pub struct SqliteMoodStore {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version >= MOOD_SCHEMA_VERSION {
        return Ok(());
    }
    info!("Creating mood ledger schema at version {}", MOOD_SCHEMA_VERSION);
    conn.execute_batch(CREATE_MOOD_SCHEMA)?;
    conn.pragma_update(None, "user_version", MOOD_SCHEMA_VERSION)?;
    Ok(())
}

// Helper: serialize a string list to a JSON TEXT column
pub(crate) fn to_json_array(v: &[String]) -> String {
    serde_json::to_string(v).unwrap()
}

// Helper: deserialize a JSON TEXT column back into a string list
pub(crate) fn parse_json_array(s: String) -> Vec<String> {
    serde_json::from_str(&s).unwrap_or_else(|e| {
        warn!("Malformed JSON array in mood db: {}: {}", s, e);
        Vec::new()
    })
}

fn row_to_observation(row: &Row<'_>) -> rusqlite::Result<MoodObservation> {
    let rank: i64 = row.get(1)?;
    let level = MoodLevel::from_rank(rank).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Integer,
            format!("invalid mood rank {}", rank).into(),
        )
    })?;
    Ok(MoodObservation {
        id: row.get(0)?,
        level,
        context: row.get(2)?,
        activities: parse_json_array(row.get(3)?),
        tags: parse_json_array(row.get(4)?),
        playlist_id: row.get(5)?,
    })
}

impl SqliteMoodStore {
    /// Create a new SqliteMoodStore.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open mood database")?;

        migrate_if_needed(&write_conn)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on mood write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open mood database for reading")?;

        read_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on mood read connection")?;

        let count: usize = read_conn.query_row("SELECT COUNT(*) FROM moods", [], |r| r.get(0))?;
        info!("Mood ledger ready: {} observations", count);

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
        })
    }
}

impl MoodStore for SqliteMoodStore {
    fn record(&self, mood: NewMood) -> Result<MoodObservation> {
        let conn = self.write_conn.lock().unwrap();
        // The write connection is held for the whole insert, so bumping the
        // identifier on collision cannot race with another writer.
        let mut id = now_ms();
        loop {
            let result = conn.execute(
                "INSERT INTO moods (id, level, context, activities, tags, playlist_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
                params![
                    id,
                    mood.level.rank(),
                    mood.context,
                    to_json_array(&mood.activities),
                    to_json_array(&mood.tags),
                ],
            );
            match result {
                Ok(_) => break,
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    id += 1;
                }
                Err(e) => return Err(e).context("Failed to insert mood observation"),
            }
        }
        Ok(MoodObservation {
            id,
            level: mood.level,
            context: mood.context,
            activities: mood.activities,
            tags: mood.tags,
            playlist_id: None,
        })
    }

    fn find(&self, id: i64) -> Result<Option<MoodObservation>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, level, context, activities, tags, playlist_id
             FROM moods WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_observation).optional()?;
        Ok(result)
    }

    fn query(&self, query: &MoodQuery) -> Result<Vec<MoodObservation>> {
        let end = query.end.unwrap_or_else(now_ms);
        let conn = self.read_conn.lock().unwrap();

        let mut entries = match query.level {
            Some(level) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, level, context, activities, tags, playlist_id
                     FROM moods WHERE id >= ?1 AND id < ?2 AND level = ?3
                     ORDER BY id DESC",
                )?;
                let rows = stmt.query_map(
                    params![query.start, end, level.rank()],
                    row_to_observation,
                )?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, level, context, activities, tags, playlist_id
                     FROM moods WHERE id >= ?1 AND id < ?2
                     ORDER BY id DESC",
                )?;
                let rows = stmt.query_map(params![query.start, end], row_to_observation)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        if !query.tags.is_empty() {
            entries.retain(|e| e.tags.iter().any(|t| query.tags.contains(t)));
        }

        Ok(entries)
    }

    fn set_playlist(&self, id: i64, playlist_id: &str) -> Result<bool> {
        let conn = self.write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE moods SET playlist_id = ?2 WHERE id = ?1 AND playlist_id IS NULL",
            params![id, playlist_id],
        )?;
        Ok(changed > 0)
    }
}
