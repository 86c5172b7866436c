//! SQLite repository integration tests
//!
//! Exercises DbStorage against a real database file, including the
//! constraints the schema adds beyond the application-level checks.

use chrono::Utc;
use npai_api::session::engine::{SessionEngine, StartRequest};
use npai_api::storage::{DbStorage, Storage};
use npai_common::db::init_database;
use npai_common::db::models::{
    MeditationSession, NewChatMessage, NewFavorite, NewMeditation,
};
use npai_common::events::{MeditationPhase, SessionEvent, SessionStatus};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

async fn test_storage() -> (tempfile::TempDir, DbStorage) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("test.db")).await.unwrap();
    (dir, DbStorage::new(pool))
}

fn sample_session(user_id: &str, status: SessionStatus) -> MeditationSession {
    MeditationSession {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        meditation_id: None,
        soundscape_id: None,
        neural_pattern_id: None,
        status,
        current_phase: Some(MeditationPhase::Preparation),
        intensity: 5.0,
        target_duration: 1200,
        actual_duration: None,
        started_at: Utc::now(),
        ended_at: None,
        config: Some(json!({"ambient": "nebula"})),
    }
}

#[tokio::test]
async fn test_meditation_round_trip_preserves_json_blobs() {
    let (_dir, storage) = test_storage().await;

    let created = storage
        .create_meditation(NewMeditation {
            pattern: "merkaba".to_string(),
            duration: 900,
            frequencies: json!([{"hz": 528.0, "type": "healing"}]),
            geometry_sequence: json!([{"shape": "spiral", "transform": "rotate", "color": "#80ffdb", "timing": 6.0}]),
            neural_targets: json!(["pineal_gland"]),
            consciousness_level: "theta".to_string(),
            awakening_code: "SGM-MER-ABC123".to_string(),
        })
        .await
        .unwrap();

    let fetched = storage.get_meditation(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.pattern, "merkaba");
    assert_eq!(fetched.frequencies[0]["hz"], 528.0);
    assert_eq!(fetched.geometry_sequence[0]["shape"], "spiral");
    assert_eq!(fetched.awakening_code, "SGM-MER-ABC123");

    assert_eq!(storage.list_meditations().await.unwrap().len(), 1);
    assert!(storage.get_meditation("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_lifecycle_and_running_constraint() {
    let (_dir, storage) = test_storage().await;

    let session = storage
        .create_session(sample_session("u1", SessionStatus::Running))
        .await
        .unwrap();

    // The partial unique index rejects a second running row for the user
    let err = storage
        .create_session(sample_session("u1", SessionStatus::Running))
        .await;
    assert!(matches!(err, Err(npai_common::Error::InvalidInput(_))));

    // Status/phase round-trip through their wire spelling
    let mut loaded = storage.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, SessionStatus::Running);
    assert_eq!(loaded.current_phase, Some(MeditationPhase::Preparation));
    assert_eq!(loaded.config.as_ref().unwrap()["ambient"], "nebula");

    loaded.status = SessionStatus::Completed;
    loaded.current_phase = Some(MeditationPhase::Integration);
    loaded.actual_duration = Some(64);
    loaded.ended_at = Some(Utc::now());
    storage.update_session(&loaded).await.unwrap();

    assert!(storage.get_running_session("u1").await.unwrap().is_none());

    // With the first session completed a new running one is allowed
    storage
        .create_session(sample_session("u1", SessionStatus::Running))
        .await
        .unwrap();

    // Updating a deleted/unknown session reports not-found
    let ghost = sample_session("u1", SessionStatus::Paused);
    assert!(matches!(
        storage.update_session(&ghost).await,
        Err(npai_common::Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_session_events_append_and_recent_ordering() {
    let (_dir, storage) = test_storage().await;
    let session = storage
        .create_session(sample_session("u1", SessionStatus::Running))
        .await
        .unwrap();

    for minutes in 0..7 {
        storage
            .append_session_event(
                &session.id,
                &SessionEvent::SessionPaused {
                    phase: Some(MeditationPhase::Preparation),
                    elapsed_minutes: minutes,
                    timestamp: Utc::now(),
                },
            )
            .await
            .unwrap();
    }

    let recent = storage.recent_session_events(&session.id, 5).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].event_type, "session_paused");
    assert_eq!(recent[0].payload["elapsed_minutes"], json!(6));
    assert_eq!(recent[4].payload["elapsed_minutes"], json!(2));
}

#[tokio::test]
async fn test_favorites_unique_constraint() {
    let (_dir, storage) = test_storage().await;

    let new = NewFavorite {
        user_id: "u1".to_string(),
        entity_type: "soundscape".to_string(),
        entity_id: "s1".to_string(),
    };

    let favorite = storage.create_favorite(new.clone()).await.unwrap();

    let err = storage.create_favorite(new).await;
    assert!(matches!(err, Err(npai_common::Error::InvalidInput(_))));

    assert!(storage.delete_favorite("u1", &favorite.id).await.unwrap());
    assert!(!storage.delete_favorite("u1", &favorite.id).await.unwrap());
}

#[tokio::test]
async fn test_chat_session_deletion_cascades() {
    let (_dir, storage) = test_storage().await;

    storage
        .get_or_create_chat_session("chat-db-test", Some("u1"))
        .await
        .unwrap();
    for role in ["user", "assistant"] {
        storage
            .append_chat_message(NewChatMessage {
                chat_session_id: "chat-db-test".to_string(),
                role: role.to_string(),
                content: format!("{} message", role),
            })
            .await
            .unwrap();
    }

    assert_eq!(
        storage.list_chat_messages("chat-db-test").await.unwrap().len(),
        2
    );

    assert!(storage.delete_chat_session("chat-db-test").await.unwrap());
    assert!(storage
        .list_chat_messages("chat-db-test")
        .await
        .unwrap()
        .is_empty());
    assert!(storage
        .get_chat_session("chat-db-test")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_engine_runs_against_sqlite() {
    let (_dir, storage) = test_storage().await;
    let engine = SessionEngine::new(Arc::new(storage));

    let started = engine.start("u1", StartRequest::default()).await.unwrap();
    assert_eq!(started.session.status, SessionStatus::Running);

    let advance = engine
        .advance_phase("u1", &started.session.id, Some("calm".to_string()))
        .await
        .unwrap();
    assert_eq!(advance.phase, MeditationPhase::Induction);
    assert_eq!(advance.progress_percent, 40);

    let current = engine.current("u1").await.unwrap().unwrap();
    assert_eq!(current.progress_percent, 40);
    assert_eq!(current.recent_events.len(), 2);
    assert_eq!(current.recent_events[0].event_type, "phase_advanced");

    for _ in 0..3 {
        engine
            .advance_phase("u1", &started.session.id, None)
            .await
            .unwrap();
    }
    assert!(engine.current("u1").await.unwrap().is_none());
}
