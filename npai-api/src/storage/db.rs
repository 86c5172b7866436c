//! SQLite-backed repository
//!
//! One query per method over the pool created by `npai_common::db::init`.
//! Listings are ordered by `created_at`. Unique-constraint violations
//! (running-session partial index, favorite triple) are reported as
//! `Error::InvalidInput` so the engine can surface them as conflicts.

use super::Storage;
use async_trait::async_trait;
use chrono::Utc;
use npai_common::db::models::{
    Affirmation, ChatMessage, ChatSession, HeartGalaxySession, Meditation, MeditationSession,
    NeuralPattern, NewAffirmation, NewChatMessage, NewFavorite, NewHeartGalaxySession,
    NewMeditation, NewNeuralPattern, NewSoundscape, SessionEventRecord, Soundscape, User,
    UserFavorite, UserPreferences,
};
use npai_common::events::SessionEvent;
use npai_common::{Error, Result};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// SQLite implementation of [`Storage`]
pub struct DbStorage {
    pool: SqlitePool,
}

impl DbStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Remap unique-constraint violations so callers can distinguish them from
/// real database failures
fn map_insert_error(err: sqlx::Error, what: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Error::InvalidInput(format!("{} already exists", what));
        }
    }
    Error::Database(err)
}

/// Manual row mapping for sessions: status and phase are stored as their
/// wire spelling and parsed back into the enums
fn session_from_row(row: &SqliteRow) -> Result<MeditationSession> {
    let status: String = row.try_get("status")?;
    let current_phase: Option<String> = row.try_get("current_phase")?;

    Ok(MeditationSession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        meditation_id: row.try_get("meditation_id")?,
        soundscape_id: row.try_get("soundscape_id")?,
        neural_pattern_id: row.try_get("neural_pattern_id")?,
        status: status
            .parse()
            .map_err(|e: String| Error::Internal(e))?,
        current_phase: current_phase
            .map(|p| p.parse())
            .transpose()
            .map_err(|e: String| Error::Internal(e))?,
        intensity: row.try_get("intensity")?,
        target_duration: row.try_get("target_duration")?,
        actual_duration: row.try_get("actual_duration")?,
        started_at: row.try_get("started_at")?,
        ended_at: row.try_get("ended_at")?,
        config: row.try_get::<Option<Value>, _>("config")?,
    })
}

#[async_trait]
impl Storage for DbStorage {
    async fn upsert_user(&self, user: User) -> Result<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET username = excluded.username, email = excluded.email
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_meditation(&self, new: NewMeditation) -> Result<Meditation> {
        let meditation = Meditation {
            id: new_id(),
            pattern: new.pattern,
            duration: new.duration,
            frequencies: new.frequencies,
            geometry_sequence: new.geometry_sequence,
            neural_targets: new.neural_targets,
            consciousness_level: new.consciousness_level,
            awakening_code: new.awakening_code,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO meditations
                (id, pattern, duration, frequencies, geometry_sequence, neural_targets,
                 consciousness_level, awakening_code, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meditation.id)
        .bind(&meditation.pattern)
        .bind(meditation.duration)
        .bind(&meditation.frequencies)
        .bind(&meditation.geometry_sequence)
        .bind(&meditation.neural_targets)
        .bind(&meditation.consciousness_level)
        .bind(&meditation.awakening_code)
        .bind(meditation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(meditation)
    }

    async fn get_meditation(&self, id: &str) -> Result<Option<Meditation>> {
        let meditation =
            sqlx::query_as::<_, Meditation>("SELECT * FROM meditations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(meditation)
    }

    async fn list_meditations(&self) -> Result<Vec<Meditation>> {
        let meditations =
            sqlx::query_as::<_, Meditation>("SELECT * FROM meditations ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(meditations)
    }

    async fn create_affirmation(&self, new: NewAffirmation) -> Result<Affirmation> {
        let affirmation = Affirmation {
            id: new_id(),
            text: new.text,
            category: new.category,
            vibrational_frequency: new.vibrational_frequency,
            cosmic_alignment: new.cosmic_alignment,
            user_id: new.user_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO affirmations
                (id, text, category, vibrational_frequency, cosmic_alignment, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&affirmation.id)
        .bind(&affirmation.text)
        .bind(&affirmation.category)
        .bind(affirmation.vibrational_frequency)
        .bind(&affirmation.cosmic_alignment)
        .bind(&affirmation.user_id)
        .bind(affirmation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(affirmation)
    }

    async fn get_affirmation(&self, id: &str) -> Result<Option<Affirmation>> {
        let affirmation =
            sqlx::query_as::<_, Affirmation>("SELECT * FROM affirmations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(affirmation)
    }

    async fn list_affirmations_by_category(&self, category: &str) -> Result<Vec<Affirmation>> {
        let affirmations = sqlx::query_as::<_, Affirmation>(
            "SELECT * FROM affirmations WHERE category = ? ORDER BY created_at",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(affirmations)
    }

    async fn create_soundscape(&self, new: NewSoundscape) -> Result<Soundscape> {
        let soundscape = Soundscape {
            id: new_id(),
            name: new.name,
            frequencies: new.frequencies,
            duration: new.duration,
            galactic_type: new.galactic_type,
            audio_params: new.audio_params,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO soundscapes
                (id, name, frequencies, duration, galactic_type, audio_params, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&soundscape.id)
        .bind(&soundscape.name)
        .bind(&soundscape.frequencies)
        .bind(soundscape.duration)
        .bind(&soundscape.galactic_type)
        .bind(&soundscape.audio_params)
        .bind(soundscape.created_at)
        .execute(&self.pool)
        .await?;

        Ok(soundscape)
    }

    async fn get_soundscape(&self, id: &str) -> Result<Option<Soundscape>> {
        let soundscape =
            sqlx::query_as::<_, Soundscape>("SELECT * FROM soundscapes WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(soundscape)
    }

    async fn list_soundscapes(&self) -> Result<Vec<Soundscape>> {
        let soundscapes =
            sqlx::query_as::<_, Soundscape>("SELECT * FROM soundscapes ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(soundscapes)
    }

    async fn create_neural_pattern(&self, new: NewNeuralPattern) -> Result<NeuralPattern> {
        let pattern = NeuralPattern {
            id: new_id(),
            pattern_type: new.pattern_type,
            brain_waves: new.brain_waves,
            visualization_data: new.visualization_data,
            activation_sequence: new.activation_sequence,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO neural_patterns
                (id, pattern_type, brain_waves, visualization_data, activation_sequence, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pattern.id)
        .bind(&pattern.pattern_type)
        .bind(&pattern.brain_waves)
        .bind(&pattern.visualization_data)
        .bind(&pattern.activation_sequence)
        .bind(pattern.created_at)
        .execute(&self.pool)
        .await?;

        Ok(pattern)
    }

    async fn get_neural_pattern(&self, id: &str) -> Result<Option<NeuralPattern>> {
        let pattern =
            sqlx::query_as::<_, NeuralPattern>("SELECT * FROM neural_patterns WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(pattern)
    }

    async fn list_neural_patterns_by_type(
        &self,
        pattern_type: &str,
    ) -> Result<Vec<NeuralPattern>> {
        let patterns = sqlx::query_as::<_, NeuralPattern>(
            "SELECT * FROM neural_patterns WHERE pattern_type = ? ORDER BY created_at",
        )
        .bind(pattern_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(patterns)
    }

    async fn create_heart_galaxy_session(
        &self,
        new: NewHeartGalaxySession,
    ) -> Result<HeartGalaxySession> {
        let session = HeartGalaxySession {
            id: new_id(),
            user_id: new.user_id,
            meditation_session_id: new.meditation_session_id,
            heart_rate: new.heart_rate,
            coherence_level: new.coherence_level,
            galaxy_sync_status: new.galaxy_sync_status,
            cosmic_coordinates: new.cosmic_coordinates,
            session_duration: new.session_duration,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO heart_galaxy_sessions
                (id, user_id, meditation_session_id, heart_rate, coherence_level,
                 galaxy_sync_status, cosmic_coordinates, session_duration, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.meditation_session_id)
        .bind(session.heart_rate)
        .bind(session.coherence_level)
        .bind(&session.galaxy_sync_status)
        .bind(&session.cosmic_coordinates)
        .bind(session.session_duration)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    async fn list_heart_galaxy_sessions_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<HeartGalaxySession>> {
        let sessions = sqlx::query_as::<_, HeartGalaxySession>(
            "SELECT * FROM heart_galaxy_sessions WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn create_session(&self, session: MeditationSession) -> Result<MeditationSession> {
        sqlx::query(
            r#"
            INSERT INTO meditation_sessions
                (id, user_id, meditation_id, soundscape_id, neural_pattern_id, status,
                 current_phase, intensity, target_duration, actual_duration, started_at,
                 ended_at, config)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.meditation_id)
        .bind(&session.soundscape_id)
        .bind(&session.neural_pattern_id)
        .bind(session.status.to_string())
        .bind(session.current_phase.map(|p| p.to_string()))
        .bind(session.intensity)
        .bind(session.target_duration)
        .bind(session.actual_duration)
        .bind(session.started_at)
        .bind(session.ended_at)
        .bind(&session.config)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "running session"))?;

        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Option<MeditationSession>> {
        let row = sqlx::query("SELECT * FROM meditation_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    async fn update_session(&self, session: &MeditationSession) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE meditation_sessions
            SET status = ?, current_phase = ?, intensity = ?, actual_duration = ?,
                ended_at = ?, config = ?
            WHERE id = ?
            "#,
        )
        .bind(session.status.to_string())
        .bind(session.current_phase.map(|p| p.to_string()))
        .bind(session.intensity)
        .bind(session.actual_duration)
        .bind(session.ended_at)
        .bind(&session.config)
        .bind(&session.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("session {}", session.id)));
        }
        Ok(())
    }

    async fn get_running_session(&self, user_id: &str) -> Result<Option<MeditationSession>> {
        let row = sqlx::query(
            "SELECT * FROM meditation_sessions WHERE user_id = ? AND status = 'running'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    async fn append_session_event(
        &self,
        session_id: &str,
        event: &SessionEvent,
    ) -> Result<SessionEventRecord> {
        let payload = serde_json::to_value(event)
            .map_err(|e| Error::Internal(format!("event serialization: {}", e)))?;
        let record = SessionEventRecord {
            id: new_id(),
            session_id: session_id.to_string(),
            event_type: event.event_type().to_string(),
            payload,
            timestamp: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO meditation_session_events (id, session_id, event_type, payload, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.session_id)
        .bind(&record.event_type)
        .bind(&record.payload)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn recent_session_events(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionEventRecord>> {
        let events = sqlx::query_as::<_, SessionEventRecord>(
            r#"
            SELECT * FROM meditation_session_events
            WHERE session_id = ?
            ORDER BY timestamp DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn get_or_create_chat_session(
        &self,
        id: &str,
        user_id: Option<&str>,
    ) -> Result<ChatSession> {
        if let Some(existing) = self.get_chat_session(id).await? {
            return Ok(existing);
        }

        let session = ChatSession {
            id: id.to_string(),
            user_id: user_id.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO chat_sessions (id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(session.created_at)
            .execute(&self.pool)
            .await?;

        Ok(session)
    }

    async fn get_chat_session(&self, id: &str) -> Result<Option<ChatSession>> {
        let session =
            sqlx::query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(session)
    }

    async fn delete_chat_session(&self, id: &str) -> Result<bool> {
        // Delete children first; foreign_keys enforcement is per-connection,
        // so the cascade cannot be assumed on every pool connection.
        sqlx::query("DELETE FROM chat_messages WHERE chat_session_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_chat_message(&self, new: NewChatMessage) -> Result<ChatMessage> {
        let message = ChatMessage {
            id: new_id(),
            chat_session_id: new.chat_session_id,
            role: new.role,
            content: new.content,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, chat_session_id, role, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.chat_session_id)
        .bind(&message.role)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list_chat_messages(&self, chat_session_id: &str) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages WHERE chat_session_id = ? ORDER BY created_at",
        )
        .bind(chat_session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn find_favorite(
        &self,
        user_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<UserFavorite>> {
        let favorite = sqlx::query_as::<_, UserFavorite>(
            r#"
            SELECT * FROM user_favorites
            WHERE user_id = ? AND entity_type = ? AND entity_id = ?
            "#,
        )
        .bind(user_id)
        .bind(entity_type)
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    async fn create_favorite(&self, new: NewFavorite) -> Result<UserFavorite> {
        let favorite = UserFavorite {
            id: new_id(),
            user_id: new.user_id,
            entity_type: new.entity_type,
            entity_id: new.entity_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO user_favorites (id, user_id, entity_type, entity_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&favorite.id)
        .bind(&favorite.user_id)
        .bind(&favorite.entity_type)
        .bind(&favorite.entity_id)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "favorite"))?;

        Ok(favorite)
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<UserFavorite>> {
        let favorites = sqlx::query_as::<_, UserFavorite>(
            "SELECT * FROM user_favorites WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(favorites)
    }

    async fn delete_favorite(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_preferences(&self, prefs: UserPreferences) -> Result<UserPreferences> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences
                (user_id, preferred_duration, default_intensity, settings, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                preferred_duration = excluded.preferred_duration,
                default_intensity = excluded.default_intensity,
                settings = excluded.settings,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&prefs.user_id)
        .bind(prefs.preferred_duration)
        .bind(prefs.default_intensity)
        .bind(&prefs.settings)
        .bind(prefs.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(prefs)
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let prefs = sqlx::query_as::<_, UserPreferences>(
            "SELECT * FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(prefs)
    }
}
