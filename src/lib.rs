//! Moodify Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod error;
pub mod journal_store;
pub mod mood_store;
pub mod music;
pub mod review;
pub mod server;

// Re-export commonly used types for convenience
pub use journal_store::{JournalStore, SqliteJournalStore};
pub use mood_store::{MoodStore, SqliteMoodStore};
pub use music::{make_music_service, MusicService};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
