//! SQLite-backed voice record repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use voicebox_core::error::VoiceboxError;
use voicebox_core::ports::VoiceRepository;
use voicebox_core::types::{NewVoice, UserId, VoiceField, VoiceId, VoiceRecord};

use crate::db::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, voice_path, name, description, tags, author, author_id, created_at FROM voices";

/// Repository for voice records.
pub struct SqliteVoiceRepository {
    db: Arc<Database>,
}

impl SqliteVoiceRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new record and return its id.
    pub fn save(&self, voice: &NewVoice) -> Result<VoiceId, VoiceboxError> {
        let tags = serde_json::to_string(&voice.tags)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO voices (voice_path, name, description, tags, author, author_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    voice.voice_path,
                    voice.name,
                    voice.description,
                    tags,
                    voice.author,
                    voice.author_id.0,
                ],
            )
            .map_err(|e| VoiceboxError::Storage(format!("Failed to save voice: {}", e)))?;
            Ok(VoiceId(conn.last_insert_rowid()))
        })
    }

    /// Find a record by id.
    pub fn find_by_id(&self, id: VoiceId) -> Result<Option<VoiceRecord>, VoiceboxError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
                .map_err(|e| VoiceboxError::Storage(e.to_string()))?;

            let mut rows = stmt
                .query_map(rusqlite::params![id.0], |row| Ok(row_to_voice_record(row)))
                .map_err(|e| VoiceboxError::Storage(e.to_string()))?;

            let record = match rows.next() {
                Some(row) => Some(row.map_err(|e| VoiceboxError::Storage(e.to_string()))??),
                None => None,
            };
            Ok(record)
        })
    }

    /// All records of one author, oldest first.
    pub fn find_by_author(&self, author_id: UserId) -> Result<Vec<VoiceRecord>, VoiceboxError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "{} WHERE author_id = ?1 ORDER BY id ASC",
                    SELECT_COLUMNS
                ))
                .map_err(|e| VoiceboxError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![author_id.0], |row| {
                    Ok(row_to_voice_record(row))
                })
                .map_err(|e| VoiceboxError::Storage(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                let record = row.map_err(|e| VoiceboxError::Storage(e.to_string()))??;
                records.push(record);
            }
            Ok(records)
        })
    }

    /// Overwrite the name or description of a record.
    pub fn set_field(
        &self,
        id: VoiceId,
        field: VoiceField,
        value: &str,
    ) -> Result<(), VoiceboxError> {
        // The column comes from a closed enum, never from user input.
        let sql = format!("UPDATE voices SET {} = ?1 WHERE id = ?2", field.column());
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(&sql, rusqlite::params![value, id.0])
                .map_err(|e| VoiceboxError::Storage(format!("Failed to update voice: {}", e)))?;
            if changed == 0 {
                return Err(VoiceboxError::NotFound(id));
            }
            Ok(())
        })
    }

    /// Delete a record by id.
    pub fn remove(&self, id: VoiceId) -> Result<(), VoiceboxError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM voices WHERE id = ?1", rusqlite::params![id.0])
                .map_err(|e| VoiceboxError::Storage(format!("Failed to delete voice: {}", e)))?;
            if changed == 0 {
                return Err(VoiceboxError::NotFound(id));
            }
            Ok(())
        })
    }

    /// Count all stored records.
    pub fn count(&self) -> Result<u64, VoiceboxError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM voices", [], |row| row.get(0))
                .map_err(|e| VoiceboxError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

#[async_trait]
impl VoiceRepository for SqliteVoiceRepository {
    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<VoiceRecord>, VoiceboxError> {
        self.find_by_author(author_id)
    }

    async fn insert(&self, voice: &NewVoice) -> Result<VoiceId, VoiceboxError> {
        let id = self.save(voice)?;
        debug!(voice_id = %id, author_id = %voice.author_id, "Voice record inserted");
        Ok(id)
    }

    async fn update_field(
        &self,
        id: VoiceId,
        field: VoiceField,
        value: &str,
    ) -> Result<(), VoiceboxError> {
        self.set_field(id, field, value)?;
        debug!(voice_id = %id, field = %field, "Voice record updated");
        Ok(())
    }

    async fn delete(&self, id: VoiceId) -> Result<(), VoiceboxError> {
        self.remove(id)?;
        debug!(voice_id = %id, "Voice record deleted");
        Ok(())
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn row_to_voice_record(row: &rusqlite::Row<'_>) -> Result<VoiceRecord, VoiceboxError> {
    let id: i64 = row.get(0).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let voice_path: String = row.get(1).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let name: String = row.get(2).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let description: String = row.get(3).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let tags_json: String = row.get(4).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let author: String = row.get(5).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let author_id: i64 = row.get(6).map_err(|e| VoiceboxError::Storage(e.to_string()))?;
    let created_at: i64 = row.get(7).map_err(|e| VoiceboxError::Storage(e.to_string()))?;

    let tags: Vec<String> = serde_json::from_str(&tags_json)?;

    Ok(VoiceRecord {
        id: VoiceId(id),
        name,
        description,
        tags,
        author,
        author_id: UserId(author_id),
        voice_path,
        created_at: epoch_to_utc(created_at),
    })
}

fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
