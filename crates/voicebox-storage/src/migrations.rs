//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use voicebox_core::error::VoiceboxError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), VoiceboxError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| VoiceboxError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| VoiceboxError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: voices");
    }

    Ok(())
}

/// Version 1: voice records.
///
/// `tags` holds a JSON array of strings.
fn apply_v1(conn: &Connection) -> Result<(), VoiceboxError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS voices (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            voice_path      TEXT NOT NULL,
            name            TEXT NOT NULL DEFAULT '',
            description     TEXT NOT NULL DEFAULT '',
            tags            TEXT NOT NULL DEFAULT '[]',
            author          TEXT NOT NULL DEFAULT '',
            author_id       INTEGER NOT NULL,
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_voices_author_id
            ON voices (author_id, id ASC);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'voices');
        ",
    )
    .map_err(|e| VoiceboxError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_voices_table_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(voices)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(
            columns,
            vec![
                "id",
                "voice_path",
                "name",
                "description",
                "tags",
                "author",
                "author_id",
                "created_at"
            ]
        );
    }

    #[test]
    fn test_author_index_exists() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_voices_author_id'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
