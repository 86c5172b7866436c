//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Every `create_*_table` call is safe to repeat.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc creates the database file on first connect
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys (required for event/message ownership)
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent - safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;

    // Generated content entities
    create_meditations_table(pool).await?;
    create_affirmations_table(pool).await?;
    create_soundscapes_table(pool).await?;
    create_neural_patterns_table(pool).await?;
    create_heart_galaxy_sessions_table(pool).await?;

    // Phase engine tables
    create_meditation_sessions_table(pool).await?;
    create_meditation_session_events_table(pool).await?;

    // Chat tables
    create_chat_sessions_table(pool).await?;
    create_chat_messages_table(pool).await?;

    // Per-user tables
    create_user_favorites_table(pool).await?;
    create_user_preferences_table(pool).await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_meditations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meditations (
            id TEXT PRIMARY KEY,
            pattern TEXT NOT NULL,
            duration INTEGER NOT NULL,
            frequencies TEXT NOT NULL,
            geometry_sequence TEXT NOT NULL,
            neural_targets TEXT NOT NULL,
            consciousness_level TEXT NOT NULL,
            awakening_code TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_affirmations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS affirmations (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            category TEXT NOT NULL,
            vibrational_frequency INTEGER NOT NULL,
            cosmic_alignment TEXT NOT NULL,
            user_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_soundscapes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS soundscapes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            frequencies TEXT NOT NULL,
            duration INTEGER NOT NULL,
            galactic_type TEXT NOT NULL,
            audio_params TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_neural_patterns_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS neural_patterns (
            id TEXT PRIMARY KEY,
            pattern_type TEXT NOT NULL,
            brain_waves TEXT NOT NULL,
            visualization_data TEXT NOT NULL,
            activation_sequence TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_heart_galaxy_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS heart_galaxy_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            meditation_session_id TEXT,
            heart_rate INTEGER NOT NULL,
            coherence_level INTEGER NOT NULL,
            galaxy_sync_status TEXT NOT NULL,
            cosmic_coordinates TEXT NOT NULL,
            session_duration INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_meditation_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meditation_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            meditation_id TEXT,
            soundscape_id TEXT,
            neural_pattern_id TEXT,
            status TEXT NOT NULL,
            current_phase TEXT,
            intensity REAL NOT NULL,
            target_duration INTEGER NOT NULL,
            actual_duration INTEGER,
            started_at TIMESTAMP NOT NULL,
            ended_at TIMESTAMP,
            config TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Backstop for the check-then-act window on session start: the
    // "one running session per user" invariant holds even if two start
    // requests race past the application-level check.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_running_per_user
        ON meditation_sessions (user_id) WHERE status = 'running'
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_meditation_session_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meditation_session_events (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES meditation_sessions(id),
            event_type TEXT NOT NULL,
            payload TEXT NOT NULL,
            timestamp TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_session_events_session
        ON meditation_session_events (session_id, timestamp)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_chat_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_chat_messages_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_messages (
            id TEXT PRIMARY KEY,
            chat_session_id TEXT NOT NULL REFERENCES chat_sessions(id) ON DELETE CASCADE,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_favorites_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_favorites (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, entity_type, entity_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_preferences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_preferences (
            user_id TEXT PRIMARY KEY,
            preferred_duration INTEGER NOT NULL,
            default_intensity REAL NOT NULL,
            settings TEXT,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_database_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("neurapeace.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        // Schema creation is idempotent
        create_schema(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in [
            "affirmations",
            "chat_messages",
            "chat_sessions",
            "heart_galaxy_sessions",
            "meditation_session_events",
            "meditation_sessions",
            "meditations",
            "neural_patterns",
            "soundscapes",
            "user_favorites",
            "user_preferences",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_running_session_index_rejects_second_running_row() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("test.db")).await.unwrap();

        let insert = r#"
            INSERT INTO meditation_sessions
                (id, user_id, status, current_phase, intensity, target_duration, started_at)
            VALUES (?, 'u1', ?, 'preparation', 5.0, 1200, '2026-01-01T00:00:00Z')
        "#;

        sqlx::query(insert)
            .bind("s1")
            .bind("running")
            .execute(&pool)
            .await
            .unwrap();

        // Second running session for the same user violates the partial index
        let err = sqlx::query(insert)
            .bind("s2")
            .bind("running")
            .execute(&pool)
            .await;
        assert!(err.is_err());

        // A completed session for the same user is fine
        sqlx::query(insert)
            .bind("s3")
            .bind("completed")
            .execute(&pool)
            .await
            .unwrap();
    }
}
