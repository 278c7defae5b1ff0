//! Voicebox storage crate - SQLite persistence for voice records.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! `VoiceRepository` implementation used by the dialogue engine.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::SqliteVoiceRepository;
