mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{MoodLevel, MoodObservation};
pub use store::SqliteMoodStore;
pub use trait_def::{MoodQuery, MoodStore, NewMood};

/// Current time in milliseconds since the Unix epoch.
///
/// Used both as the creation timestamp and as the identifier of ledger
/// entries; stores bump the value on collision so identifiers stay unique.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
