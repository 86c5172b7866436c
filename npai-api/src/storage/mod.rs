//! Persistence repository
//!
//! The repository is an explicit dependency injected as `Arc<dyn Storage>`
//! into the API layer and the phase engine; there is no ambient global.
//! Two implementations with equivalent semantics: [`MemStorage`] (per-entity
//! maps behind one lock, insertion-ordered listings) and [`DbStorage`]
//! (SQLite, created_at-ordered listings, durable).
//!
//! Single-row atomicity only. The one cross-row invariant, "at most one
//! running meditation session per user", is held by `create_session`:
//! MemStorage checks under its write lock, DbStorage relies on a partial
//! unique index. Violations surface as `Error::InvalidInput`, which the
//! phase engine maps to a conflict.

mod db;
mod memory;

pub use db::DbStorage;
pub use memory::MemStorage;

use async_trait::async_trait;
use npai_common::db::models::{
    Affirmation, ChatMessage, ChatSession, HeartGalaxySession, Meditation, MeditationSession,
    NeuralPattern, NewAffirmation, NewChatMessage, NewFavorite, NewHeartGalaxySession,
    NewMeditation, NewNeuralPattern, NewSoundscape, SessionEventRecord, Soundscape, User,
    UserFavorite, UserPreferences,
};
use npai_common::events::SessionEvent;
use npai_common::Result;

/// CRUD repository over every persisted entity type
#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn upsert_user(&self, user: User) -> Result<User>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    // Meditations
    async fn create_meditation(&self, new: NewMeditation) -> Result<Meditation>;
    async fn get_meditation(&self, id: &str) -> Result<Option<Meditation>>;
    async fn list_meditations(&self) -> Result<Vec<Meditation>>;

    // Affirmations
    async fn create_affirmation(&self, new: NewAffirmation) -> Result<Affirmation>;
    async fn get_affirmation(&self, id: &str) -> Result<Option<Affirmation>>;
    async fn list_affirmations_by_category(&self, category: &str) -> Result<Vec<Affirmation>>;

    // Soundscapes
    async fn create_soundscape(&self, new: NewSoundscape) -> Result<Soundscape>;
    async fn get_soundscape(&self, id: &str) -> Result<Option<Soundscape>>;
    async fn list_soundscapes(&self) -> Result<Vec<Soundscape>>;

    // Neural patterns
    async fn create_neural_pattern(&self, new: NewNeuralPattern) -> Result<NeuralPattern>;
    async fn get_neural_pattern(&self, id: &str) -> Result<Option<NeuralPattern>>;
    async fn list_neural_patterns_by_type(&self, pattern_type: &str)
        -> Result<Vec<NeuralPattern>>;

    // Heart-galaxy sessions
    async fn create_heart_galaxy_session(
        &self,
        new: NewHeartGalaxySession,
    ) -> Result<HeartGalaxySession>;
    async fn list_heart_galaxy_sessions_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<HeartGalaxySession>>;

    // Meditation sessions (phase engine)
    async fn create_session(&self, session: MeditationSession) -> Result<MeditationSession>;
    async fn get_session(&self, id: &str) -> Result<Option<MeditationSession>>;
    async fn update_session(&self, session: &MeditationSession) -> Result<()>;
    /// At most one row can match; enforced at creation time
    async fn get_running_session(&self, user_id: &str) -> Result<Option<MeditationSession>>;

    // Session events (append-only)
    async fn append_session_event(
        &self,
        session_id: &str,
        event: &SessionEvent,
    ) -> Result<SessionEventRecord>;
    /// Newest first
    async fn recent_session_events(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionEventRecord>>;

    // Chat
    async fn get_or_create_chat_session(
        &self,
        id: &str,
        user_id: Option<&str>,
    ) -> Result<ChatSession>;
    async fn get_chat_session(&self, id: &str) -> Result<Option<ChatSession>>;
    /// Returns false if the session did not exist; deletion cascades to messages
    async fn delete_chat_session(&self, id: &str) -> Result<bool>;
    async fn append_chat_message(&self, new: NewChatMessage) -> Result<ChatMessage>;
    /// Ordered oldest first
    async fn list_chat_messages(&self, chat_session_id: &str) -> Result<Vec<ChatMessage>>;

    // Favorites
    async fn find_favorite(
        &self,
        user_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<UserFavorite>>;
    async fn create_favorite(&self, new: NewFavorite) -> Result<UserFavorite>;
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<UserFavorite>>;
    /// Returns false if no favorite with that id belongs to the user
    async fn delete_favorite(&self, user_id: &str, id: &str) -> Result<bool>;

    // Preferences
    async fn upsert_preferences(&self, prefs: UserPreferences) -> Result<UserPreferences>;
    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>>;
}
