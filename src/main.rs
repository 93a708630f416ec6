use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodify_server::config::{
    AppConfig, FileConfig, DEFAULT_JOURNAL_MAX_TEXT_LEN, DEFAULT_TOP_SONGS_LIMIT,
};
use moodify_server::{
    make_music_service, run_server, RequestsLoggingLevel, ServerConfig, SqliteJournalStore,
    SqliteMoodStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the SQLite database files.
    #[clap(long, default_value = "./data", value_parser = parse_path)]
    pub db_dir: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to a TOML config file. File values override CLI values and
    /// carry the music provider credentials.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The maximum journal entry text length in characters.
    #[clap(long, default_value_t = DEFAULT_JOURNAL_MAX_TEXT_LEN)]
    pub journal_max_text_len: usize,

    /// Number of favorite songs reported in a monthly review.
    #[clap(long, default_value_t = DEFAULT_TOP_SONGS_LIMIT)]
    pub top_songs_limit: usize,
}

fn resolve_config(cli_args: CliArgs) -> Result<(AppConfig, RequestsLoggingLevel)> {
    let file_config = match &cli_args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let logging_level = match file_config.logging_level {
        Some(name) => clap::ValueEnum::from_str(&name, true)
            .map_err(|_| anyhow::anyhow!("Invalid logging_level in config file: {}", name))?,
        None => cli_args.logging_level,
    };

    let db_dir = match file_config.db_dir {
        Some(dir) => parse_path(&dir)?,
        None => cli_args.db_dir,
    };

    let config = AppConfig {
        db_dir,
        port: file_config.port.unwrap_or(cli_args.port),
        journal_max_text_len: file_config
            .journal_max_text_len
            .unwrap_or(cli_args.journal_max_text_len),
        top_songs_limit: file_config.top_songs_limit.unwrap_or(cli_args.top_songs_limit),
        provider: file_config.provider,
    };
    Ok((config, logging_level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let (config, logging_level) = resolve_config(cli_args)?;

    std::fs::create_dir_all(&config.db_dir)
        .with_context(|| format!("Failed to create db dir {:?}", config.db_dir))?;

    info!("Opening SQLite databases under {:?}...", config.db_dir);
    let mood_store = Arc::new(SqliteMoodStore::new(config.db_dir.join("moods.db"))?);
    let journal_store = Arc::new(SqliteJournalStore::new(config.db_dir.join("journal.db"))?);

    let music = match &config.provider {
        Some(provider) => {
            info!("Music provider configured: {}", provider.provider);
            Some(make_music_service(provider)?)
        }
        None => {
            warn!("No music provider configured, playlist generation is disabled");
            None
        }
    };

    let server_config = ServerConfig {
        requests_logging_level: logging_level,
        port: config.port,
        journal_max_text_len: config.journal_max_text_len,
        top_songs_limit: config.top_songs_limit,
    };

    info!("Ready to serve at port {}!", server_config.port);
    run_server(mood_store, journal_store, music, server_config).await
}
