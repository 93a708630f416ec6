use axum::extract::FromRef;

use crate::journal_store::JournalStore;
use crate::mood_store::MoodStore;
use crate::music::MusicService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedMoodStore = Arc<dyn MoodStore>;
pub type GuardedJournalStore = Arc<dyn JournalStore>;
pub type OptionalMusicService = Option<Arc<dyn MusicService>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub mood_store: GuardedMoodStore,
    pub journal_store: GuardedJournalStore,
    pub music: OptionalMusicService,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedMoodStore {
    fn from_ref(input: &ServerState) -> Self {
        input.mood_store.clone()
    }
}

impl FromRef<ServerState> for GuardedJournalStore {
    fn from_ref(input: &ServerState) -> Self {
        input.journal_store.clone()
    }
}

impl FromRef<ServerState> for OptionalMusicService {
    fn from_ref(input: &ServerState) -> Self {
        input.music.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
