use super::RequestsLoggingLevel;
use crate::config::{DEFAULT_JOURNAL_MAX_TEXT_LEN, DEFAULT_TOP_SONGS_LIMIT};

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Maximum journal entry text length, characters.
    pub journal_max_text_len: usize,
    /// Number of favorite songs returned in a monthly review.
    pub top_songs_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            journal_max_text_len: DEFAULT_JOURNAL_MAX_TEXT_LEN,
            top_songs_limit: DEFAULT_TOP_SONGS_LIMIT,
        }
    }
}
