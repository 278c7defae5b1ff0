//! Voicebox application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Open the SQLite database under the data directory
//! 4. Wire the dialogue dispatcher to storage and the Telegram media fetcher
//! 5. Long-poll Telegram until Ctrl-C

mod cli;
mod fetcher;
mod telegram;

use std::sync::Arc;

use clap::Parser;
use teloxide::Bot;

use voicebox_core::config::VoiceboxConfig;
use voicebox_dialogue::{Dispatcher, StateStore};
use voicebox_storage::{Database, SqliteVoiceRepository};

use crate::cli::CliArgs;
use crate::fetcher::TelegramFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config_exists = config_file.exists();
    let mut config = VoiceboxConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Voicebox v{}", env!("CARGO_PKG_VERSION"));
    if config_exists {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    // Storage.
    let data_dir = config.data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = config.database_path();
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");
    let repository = Arc::new(SqliteVoiceRepository::new(db));

    // Telegram.
    let bot = Bot::new(config.telegram.token.clone());
    let voices_dir = config.voices_dir();
    tracing::info!(dir = %voices_dir.display(), "Voice files directory");
    let fetcher = Arc::new(TelegramFetcher::new(
        bot.clone(),
        voices_dir,
        config.media.extension.clone(),
    ));

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(StateStore::new()),
        repository,
        fetcher,
    ));

    if let Err(e) = telegram::run(bot, dispatcher, config.telegram.register_commands).await {
        tracing::error!(error = %e, "Telegram connection failed - check the bot token");
        return Err(e.into());
    }

    tracing::info!("Voicebox stopped");
    Ok(())
}
