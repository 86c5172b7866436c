//! Router assembly and shared application context

use crate::generator::Generator;
use crate::session::SessionEngine;
use crate::storage::Storage;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application context passed to all handlers
///
/// The repository and generator are explicit dependencies injected here;
/// nothing is process-global.
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn Storage>,
    pub generator: Arc<Generator>,
    pub engine: Arc<SessionEngine>,
}

impl AppContext {
    pub fn new(storage: Arc<dyn Storage>, generator: Arc<Generator>) -> Self {
        let engine = Arc::new(SessionEngine::new(Arc::clone(&storage)));
        Self {
            storage,
            generator,
            engine,
        }
    }
}

/// Build the application router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(super::health::health))

        // Auth boundary
        .route("/api/auth/user", get(super::auth::get_current_user))

        // Sacred geometry meditations
        .route("/api/sacred-geometry/generate", get(super::geometry::generate))
        .route("/api/sacred-geometry/:id", get(super::geometry::get_by_id))

        // Cosmic affirmations
        .route("/api/affirmations/cosmic", post(super::affirmations::generate))
        .route(
            "/api/affirmations/category/:category",
            get(super::affirmations::list_by_category),
        )

        // Galactic soundscapes
        .route(
            "/api/chants/galactic/synthesize",
            post(super::soundscapes::synthesize),
        )
        .route("/api/chants/galactic", get(super::soundscapes::list_all))

        // Neural patterns
        .route("/api/neural/pathways/activate", get(super::neural::activate))
        .route("/api/neural/patterns/:type", get(super::neural::list_by_type))

        // Heart-galaxy connection
        .route("/api/heart-galaxy/connect", post(super::heart_galaxy::connect))
        .route(
            "/api/heart-galaxy/sessions",
            get(super::heart_galaxy::list_sessions),
        )

        // Chat assistant
        .route("/api/chat", post(super::chat::send_message))
        .route("/api/chat/:session_id/history", get(super::chat::history))
        .route("/api/chat/:session_id", delete(super::chat::delete_session))

        // Meditation session phase engine
        .route("/api/meditation/start", post(super::meditation::start))
        .route("/api/meditation/current", get(super::meditation::current))
        .route(
            "/api/meditation/:session_id/phase/advance",
            post(super::meditation::advance_phase),
        )
        .route("/api/meditation/:session_id/pause", post(super::meditation::pause))
        .route("/api/meditation/:session_id/resume", post(super::meditation::resume))
        .route(
            "/api/meditation/:session_id/feedback",
            post(super::meditation::feedback),
        )

        // Favorites
        .route(
            "/api/favorites",
            post(super::favorites::add).get(super::favorites::list),
        )
        .route("/api/favorites/:id", delete(super::favorites::remove))

        // Preferences
        .route(
            "/api/preferences",
            get(super::preferences::get_preferences)
                .put(super::preferences::update_preferences),
        )

        // Attach application context
        .with_state(ctx)

        // Enable CORS for the SPA frontend
        .layer(CorsLayer::permissive())
}
