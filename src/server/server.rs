use anyhow::Result;
use std::time::{Duration, Instant};

use tracing::{error, warn};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, ServerConfig};
use crate::error::ApiError;
use crate::journal_store::{LyricRecord, NewJournalEntry, SongReference};
use crate::mood_store::{now_ms, MoodLevel, MoodObservation, MoodQuery, NewMood};
use crate::music::Intent;
use crate::review;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct RecordMoodBody {
    pub mood: String,
    pub context: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct RecordMoodResponse {
    mood_id: i64,
}

#[derive(Deserialize, Debug)]
struct TrendParams {
    pub start: i64,
    pub end: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct GeneratePlaylistBody {
    pub mood_id: i64,
    pub intent: Intent,
    pub name: Option<String>,
}

#[derive(Serialize)]
struct PlaylistResponse {
    playlist_id: String,
    tracks: Vec<SongReference>,
}

#[derive(Deserialize, Debug)]
struct LyricIn {
    pub text: String,
    pub song: String,
    pub artist: Option<String>,
}

#[derive(Deserialize, Debug)]
struct JournalBody {
    pub mood_id: i64,
    pub text: String,
    #[serde(default)]
    pub liked_songs: Vec<SongReference>,
    #[serde(default)]
    pub memorable_lyrics: Vec<LyricIn>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct JournalResponse {
    entry_id: i64,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn post_mood(
    State(mood_store): State<GuardedMoodStore>,
    Json(body): Json<RecordMoodBody>,
) -> Response {
    let level: MoodLevel = match body.mood.parse() {
        Ok(level) => level,
        Err(err) => return err.into_response(),
    };
    let new_mood = NewMood {
        level,
        context: body.context,
        activities: body.activities,
        tags: body.tags,
    };
    match mood_store.record(new_mood) {
        Ok(observation) => Json(RecordMoodResponse {
            mood_id: observation.id,
        })
        .into_response(),
        Err(err) => {
            error!("Failed to record mood: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_mood(State(mood_store): State<GuardedMoodStore>, Path(id): Path<i64>) -> Response {
    match mood_store.find(id) {
        Ok(Some(observation)) => Json(observation).into_response(),
        Ok(None) => ApiError::NotFound(format!("mood {}", id)).into_response(),
        Err(err) => {
            error!("Failed to look up mood {}: {:?}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_mood_trend(
    State(mood_store): State<GuardedMoodStore>,
    Query(params): Query<TrendParams>,
) -> Response {
    let query = MoodQuery {
        start: params.start,
        end: params.end,
        ..Default::default()
    };
    match mood_store.query(&query) {
        Ok(observations) => Json(review::mood_trend(&observations)).into_response(),
        Err(err) => {
            error!("Failed to query mood trend: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn default_playlist_name(mood: &MoodObservation, intent: Intent) -> String {
    let mut name = format!("Moodify - {} - {}", mood.level, intent);
    if let Some(context) = &mood.context {
        let snippet: String = context.chars().take(30).collect();
        name.push_str(&format!(" ({})", snippet));
    }
    name
}

async fn post_playlist(
    State(state): State<ServerState>,
    Json(body): Json<GeneratePlaylistBody>,
) -> Response {
    let music = match &state.music {
        Some(music) => music.clone(),
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "no music provider configured",
            )
                .into_response()
        }
    };

    let mood = match state.mood_store.find(body.mood_id) {
        Ok(Some(mood)) => mood,
        Ok(None) => return ApiError::NotFound(format!("mood {}", body.mood_id)).into_response(),
        Err(err) => {
            error!("Failed to look up mood {}: {:?}", body.mood_id, err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let tracks = match music.get_recommendations(mood.level, body.intent).await {
        Ok(tracks) => tracks,
        Err(err) => return ApiError::Provider(err).into_response(),
    };

    let name = body
        .name
        .unwrap_or_else(|| default_playlist_name(&mood, body.intent));
    let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let playlist_id = match music.create_playlist(&name, &track_ids).await {
        Ok(id) => id,
        Err(err) => return ApiError::Provider(err).into_response(),
    };

    match state.mood_store.set_playlist(mood.id, &playlist_id) {
        Ok(true) => {}
        Ok(false) => warn!("Mood {} already had a playlist, keeping it", mood.id),
        Err(err) => {
            error!("Failed to link playlist to mood {}: {:?}", mood.id, err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    Json(PlaylistResponse {
        playlist_id,
        tracks,
    })
    .into_response()
}

async fn post_journal(State(state): State<ServerState>, Json(body): Json<JournalBody>) -> Response {
    if body.text.trim().is_empty() {
        return ApiError::Validation("journal text must not be empty".to_string()).into_response();
    }
    let max_len = state.config.journal_max_text_len;
    if body.text.chars().count() > max_len {
        return ApiError::Validation(format!("journal text exceeds {} characters", max_len))
            .into_response();
    }

    let mood = match state.mood_store.find(body.mood_id) {
        Ok(Some(mood)) => mood,
        Ok(None) => return ApiError::NotFound(format!("mood {}", body.mood_id)).into_response(),
        Err(err) => {
            error!("Failed to look up mood {}: {:?}", body.mood_id, err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let captured_at = now_ms();
    let entry = NewJournalEntry {
        mood_id: mood.id,
        mood_level: mood.level,
        text: body.text,
        liked_songs: body.liked_songs,
        memorable_lyrics: body
            .memorable_lyrics
            .into_iter()
            .map(|l| LyricRecord {
                text: l.text,
                song: l.song,
                artist: l.artist,
                captured_at,
            })
            .collect(),
        tags: body.tags,
    };

    match state.journal_store.append(entry) {
        Ok(entry) => Json(JournalResponse { entry_id: entry.id }).into_response(),
        Err(err) => {
            error!("Failed to append journal entry: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_monthly_review(
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Response {
    let (start, end) = match review::month_window(year, month) {
        Some(window) => window,
        None => {
            return ApiError::Validation(format!("invalid month {}-{}", year, month))
                .into_response()
        }
    };
    match state.journal_store.query(start, end) {
        Ok(entries) => {
            Json(review::monthly_summary(&entries, state.config.top_songs_limit)).into_response()
        }
        Err(err) => {
            error!("Failed to query journal for {}-{}: {:?}", year, month, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_shared_entry(
    State(journal_store): State<GuardedJournalStore>,
    Path(entry_id): Path<i64>,
) -> Response {
    match journal_store.find(entry_id) {
        Ok(Some(entry)) => Json(review::shared_view(&entry)).into_response(),
        Ok(None) => ApiError::NotFound(format!("journal entry {}", entry_id)).into_response(),
        Err(err) => {
            error!("Failed to look up journal entry {}: {:?}", entry_id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn make_app(
    config: ServerConfig,
    mood_store: GuardedMoodStore,
    journal_store: GuardedJournalStore,
    music: OptionalMusicService,
) -> Result<Router> {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        mood_store,
        journal_store,
        music,
        hash: option_env!("GIT_HASH").unwrap_or("unknown").to_owned(),
    };

    let api_routes: Router = Router::new()
        .route("/mood", post(post_mood))
        .route("/mood/trend", get(get_mood_trend))
        .route("/mood/{id}", get(get_mood))
        .route("/playlist", post(post_playlist))
        .route("/journal", post(post_journal))
        .route("/review/{year}/{month}", get(get_monthly_review))
        .route("/share/{entry_id}", get(get_shared_entry))
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/v1", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    mood_store: GuardedMoodStore,
    journal_store: GuardedJournalStore,
    music: OptionalMusicService,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, mood_store, journal_store, music)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
