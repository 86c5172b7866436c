//! Database row models
//!
//! Generated content entities are immutable records: produced once by a
//! generator call, read-only afterwards. JSON blob columns (`frequencies`,
//! `cosmic_coordinates`, `config`, `payload`, ...) are carried as
//! `serde_json::Value` and treated as opaque beyond the typed columns.

use crate::events::{MeditationPhase, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meditation {
    pub id: String,
    pub pattern: String,
    pub duration: i64,
    pub frequencies: Value,
    pub geometry_sequence: Value,
    pub neural_targets: Value,
    pub consciousness_level: String,
    pub awakening_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Affirmation {
    pub id: String,
    pub text: String,
    pub category: String,
    pub vibrational_frequency: i64,
    pub cosmic_alignment: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Soundscape {
    pub id: String,
    pub name: String,
    pub frequencies: Value,
    pub duration: i64,
    pub galactic_type: String,
    pub audio_params: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NeuralPattern {
    pub id: String,
    pub pattern_type: String,
    pub brain_waves: Value,
    pub visualization_data: Value,
    pub activation_sequence: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeartGalaxySession {
    pub id: String,
    pub user_id: String,
    pub meditation_session_id: Option<String>,
    pub heart_rate: i64,
    pub coherence_level: i64,
    pub galaxy_sync_status: String,
    pub cosmic_coordinates: Value,
    pub session_duration: i64,
    pub created_at: DateTime<Utc>,
}

/// A phase-engine session row
///
/// Invariant: at most one session per user has status `running`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationSession {
    pub id: String,
    pub user_id: String,
    pub meditation_id: Option<String>,
    pub soundscape_id: Option<String>,
    pub neural_pattern_id: Option<String>,
    pub status: SessionStatus,
    pub current_phase: Option<MeditationPhase>,
    /// Continuous, nominally 1-10
    pub intensity: f64,
    /// Seconds, constrained to [60, 7200] at creation
    pub target_duration: i64,
    /// Seconds, set on completion
    pub actual_duration: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub config: Option<Value>,
}

/// Append-only event log row, owned by its session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionEventRecord {
    pub id: String,
    pub session_id: String,
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: String,
    pub chat_session_id: String,
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserFavorite {
    pub id: String,
    pub user_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPreferences {
    pub user_id: String,
    pub preferred_duration: i64,
    pub default_intensity: f64,
    pub settings: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Insert payloads (id and created_at are assigned by the repository)
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewMeditation {
    pub pattern: String,
    pub duration: i64,
    pub frequencies: Value,
    pub geometry_sequence: Value,
    pub neural_targets: Value,
    pub consciousness_level: String,
    pub awakening_code: String,
}

#[derive(Debug, Clone)]
pub struct NewAffirmation {
    pub text: String,
    pub category: String,
    pub vibrational_frequency: i64,
    pub cosmic_alignment: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSoundscape {
    pub name: String,
    pub frequencies: Value,
    pub duration: i64,
    pub galactic_type: String,
    pub audio_params: Value,
}

#[derive(Debug, Clone)]
pub struct NewNeuralPattern {
    pub pattern_type: String,
    pub brain_waves: Value,
    pub visualization_data: Value,
    pub activation_sequence: Value,
}

#[derive(Debug, Clone)]
pub struct NewHeartGalaxySession {
    pub user_id: String,
    pub meditation_session_id: Option<String>,
    pub heart_rate: i64,
    pub coherence_level: i64,
    pub galaxy_sync_status: String,
    pub cosmic_coordinates: Value,
    pub session_duration: i64,
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub chat_session_id: String,
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: String,
    pub entity_type: String,
    pub entity_id: String,
}
