//! In-memory repository
//!
//! Development-mode store: per-entity vectors behind a single RwLock,
//! listing in insertion order. Holding the write lock across the
//! check-and-insert in `create_session` keeps the one-running-session
//! invariant race-free without a storage engine underneath.

use super::Storage;
use async_trait::async_trait;
use chrono::Utc;
use npai_common::db::models::{
    Affirmation, ChatMessage, ChatSession, HeartGalaxySession, Meditation, MeditationSession,
    NeuralPattern, NewAffirmation, NewChatMessage, NewFavorite, NewHeartGalaxySession,
    NewMeditation, NewNeuralPattern, NewSoundscape, SessionEventRecord, Soundscape, User,
    UserFavorite, UserPreferences,
};
use npai_common::events::{SessionEvent, SessionStatus};
use npai_common::{Error, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    meditations: Vec<Meditation>,
    affirmations: Vec<Affirmation>,
    soundscapes: Vec<Soundscape>,
    neural_patterns: Vec<NeuralPattern>,
    heart_galaxy_sessions: Vec<HeartGalaxySession>,
    sessions: Vec<MeditationSession>,
    session_events: Vec<SessionEventRecord>,
    chat_sessions: Vec<ChatSession>,
    chat_messages: Vec<ChatMessage>,
    favorites: Vec<UserFavorite>,
    preferences: Vec<UserPreferences>,
}

/// In-memory implementation of [`Storage`]
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl Storage for MemStorage {
    async fn upsert_user(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.users.iter_mut().find(|u| u.id == user.id) {
            existing.username = user.username.clone();
            existing.email = user.email.clone();
            return Ok(existing.clone());
        }
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
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
        self.inner.write().await.meditations.push(meditation.clone());
        Ok(meditation)
    }

    async fn get_meditation(&self, id: &str) -> Result<Option<Meditation>> {
        let inner = self.inner.read().await;
        Ok(inner.meditations.iter().find(|m| m.id == id).cloned())
    }

    async fn list_meditations(&self) -> Result<Vec<Meditation>> {
        Ok(self.inner.read().await.meditations.clone())
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
        self.inner.write().await.affirmations.push(affirmation.clone());
        Ok(affirmation)
    }

    async fn get_affirmation(&self, id: &str) -> Result<Option<Affirmation>> {
        let inner = self.inner.read().await;
        Ok(inner.affirmations.iter().find(|a| a.id == id).cloned())
    }

    async fn list_affirmations_by_category(&self, category: &str) -> Result<Vec<Affirmation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .affirmations
            .iter()
            .filter(|a| a.category == category)
            .cloned()
            .collect())
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
        self.inner.write().await.soundscapes.push(soundscape.clone());
        Ok(soundscape)
    }

    async fn get_soundscape(&self, id: &str) -> Result<Option<Soundscape>> {
        let inner = self.inner.read().await;
        Ok(inner.soundscapes.iter().find(|s| s.id == id).cloned())
    }

    async fn list_soundscapes(&self) -> Result<Vec<Soundscape>> {
        Ok(self.inner.read().await.soundscapes.clone())
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
        self.inner.write().await.neural_patterns.push(pattern.clone());
        Ok(pattern)
    }

    async fn get_neural_pattern(&self, id: &str) -> Result<Option<NeuralPattern>> {
        let inner = self.inner.read().await;
        Ok(inner.neural_patterns.iter().find(|p| p.id == id).cloned())
    }

    async fn list_neural_patterns_by_type(
        &self,
        pattern_type: &str,
    ) -> Result<Vec<NeuralPattern>> {
        let inner = self.inner.read().await;
        Ok(inner
            .neural_patterns
            .iter()
            .filter(|p| p.pattern_type == pattern_type)
            .cloned()
            .collect())
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
        self.inner
            .write()
            .await
            .heart_galaxy_sessions
            .push(session.clone());
        Ok(session)
    }

    async fn list_heart_galaxy_sessions_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<HeartGalaxySession>> {
        let inner = self.inner.read().await;
        Ok(inner
            .heart_galaxy_sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_session(&self, session: MeditationSession) -> Result<MeditationSession> {
        let mut inner = self.inner.write().await;
        // Check and insert under the same write lock
        if session.status == SessionStatus::Running
            && inner
                .sessions
                .iter()
                .any(|s| s.user_id == session.user_id && s.status == SessionStatus::Running)
        {
            return Err(Error::InvalidInput(format!(
                "user {} already has a running session",
                session.user_id
            )));
        }
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Option<MeditationSession>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn update_session(&self, session: &MeditationSession) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("session {}", session.id))),
        }
    }

    async fn get_running_session(&self, user_id: &str) -> Result<Option<MeditationSession>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.status == SessionStatus::Running)
            .cloned())
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
        self.inner.write().await.session_events.push(record.clone());
        Ok(record)
    }

    async fn recent_session_events(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionEventRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .session_events
            .iter()
            .rev()
            .filter(|e| e.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_or_create_chat_session(
        &self,
        id: &str,
        user_id: Option<&str>,
    ) -> Result<ChatSession> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.chat_sessions.iter().find(|s| s.id == id) {
            return Ok(existing.clone());
        }
        let session = ChatSession {
            id: id.to_string(),
            user_id: user_id.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.chat_sessions.push(session.clone());
        Ok(session)
    }

    async fn get_chat_session(&self, id: &str) -> Result<Option<ChatSession>> {
        let inner = self.inner.read().await;
        Ok(inner.chat_sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn delete_chat_session(&self, id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.chat_sessions.len();
        inner.chat_sessions.retain(|s| s.id != id);
        let deleted = inner.chat_sessions.len() != before;
        if deleted {
            inner.chat_messages.retain(|m| m.chat_session_id != id);
        }
        Ok(deleted)
    }

    async fn append_chat_message(&self, new: NewChatMessage) -> Result<ChatMessage> {
        let message = ChatMessage {
            id: new_id(),
            chat_session_id: new.chat_session_id,
            role: new.role,
            content: new.content,
            created_at: Utc::now(),
        };
        self.inner.write().await.chat_messages.push(message.clone());
        Ok(message)
    }

    async fn list_chat_messages(&self, chat_session_id: &str) -> Result<Vec<ChatMessage>> {
        let inner = self.inner.read().await;
        Ok(inner
            .chat_messages
            .iter()
            .filter(|m| m.chat_session_id == chat_session_id)
            .cloned()
            .collect())
    }

    async fn find_favorite(
        &self,
        user_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<UserFavorite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .find(|f| {
                f.user_id == user_id && f.entity_type == entity_type && f.entity_id == entity_id
            })
            .cloned())
    }

    async fn create_favorite(&self, new: NewFavorite) -> Result<UserFavorite> {
        let mut inner = self.inner.write().await;
        if inner.favorites.iter().any(|f| {
            f.user_id == new.user_id
                && f.entity_type == new.entity_type
                && f.entity_id == new.entity_id
        }) {
            return Err(Error::InvalidInput(format!(
                "favorite already exists for {} {}",
                new.entity_type, new.entity_id
            )));
        }
        let favorite = UserFavorite {
            id: new_id(),
            user_id: new.user_id,
            entity_type: new.entity_type,
            entity_id: new.entity_id,
            created_at: Utc::now(),
        };
        inner.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<UserFavorite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_favorite(&self, user_id: &str, id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner.favorites.retain(|f| !(f.id == id && f.user_id == user_id));
        Ok(inner.favorites.len() != before)
    }

    async fn upsert_preferences(&self, prefs: UserPreferences) -> Result<UserPreferences> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .preferences
            .iter_mut()
            .find(|p| p.user_id == prefs.user_id)
        {
            *existing = prefs.clone();
        } else {
            inner.preferences.push(prefs.clone());
        }
        Ok(prefs)
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.iter().find(|p| p.user_id == user_id).cloned())
    }
}
