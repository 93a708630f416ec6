mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{JournalEntry, LyricRecord, SongReference};
pub use store::SqliteJournalStore;
pub use trait_def::{JournalStore, NewJournalEntry};
