//! Collaborator interfaces consumed by the dialogue engine.
//!
//! Storage and media download live behind these traits so the dialogue can
//! be driven against SQLite, Telegram, or test doubles alike.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewVoice, UserId, VoiceField, VoiceHandle, VoiceId, VoiceRecord};

/// Persistence for voice records.
#[async_trait]
pub trait VoiceRepository: Send + Sync {
    /// All records submitted by `author_id`, ordered by id.
    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<VoiceRecord>>;

    /// Insert a record and return its new id.
    async fn insert(&self, voice: &NewVoice) -> Result<VoiceId>;

    /// Overwrite one text column of an existing record.
    async fn update_field(&self, id: VoiceId, field: VoiceField, value: &str) -> Result<()>;

    /// Remove a record.
    async fn delete(&self, id: VoiceId) -> Result<()>;
}

/// Downloads uploaded audio to local storage.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch the file behind `handle` and return where it was written.
    async fn download(&self, handle: &VoiceHandle) -> Result<PathBuf>;
}
