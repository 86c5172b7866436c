//! Integration tests for the NeuraPeace AI API
//!
//! Drives the complete router (in-memory storage + mock generators)
//! through tower's oneshot, covering:
//! - Health and auth boundary
//! - Content generation surfaces and their stored entities
//! - Chat sessions and cascade deletion
//! - Favorites dedup and preferences upsert

use axum::body::Body;
use axum::http::StatusCode;
use axum::Router;
use http::{Method, Request};
use npai_api::api::{create_router, AppContext};
use npai_api::generator::mock::MockGenerator;
use npai_api::generator::Generator;
use npai_api::storage::MemStorage;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Test helper to create the router with development-mode collaborators
fn test_app() -> Router {
    let ctx = AppContext::new(
        Arc::new(MemStorage::new()),
        Arc::new(Generator::Mock(MockGenerator::new())),
    );
    create_router(ctx)
}

/// Helper to make HTTP requests against the router
async fn make_request(
    app: &Router,
    method: &str,
    path: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let method: Method = method.parse().expect("valid method");

    let mut request = Request::builder().method(method).uri(path);
    if let Some(user_id) = user {
        request = request.header("x-user-id", user_id);
    }

    let request = if let Some(json_body) = body {
        request
            .header("content-type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap()
    } else {
        request.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let (status, body) = make_request(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["dimensions_active"], 5);
    assert!(body["message"].as_str().unwrap().contains("NeuraPeace"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_sacred_geometry_generate_and_fetch() {
    let app = test_app();

    let (status, body) = make_request(
        &app,
        "GET",
        "/api/sacred-geometry/generate?intention=clarity&duration=900",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["type"], "sacred_geometry_meditation");
    assert_eq!(body["data"]["duration"], 900);
    assert!(body["data"]["frequencies"].is_array());
    assert!(body["data"]["guided_text"].as_str().unwrap().contains("clarity"));
    assert!(body["awakening_code"].as_str().unwrap().starts_with("SGM-"));
    assert_eq!(body["next_evolution"], "/api/neural/pathways/activate");

    // The stored entity is retrievable
    let id = body["data"]["meditation_id"].as_str().unwrap().to_string();
    let (status, fetched) =
        make_request(&app, "GET", &format!("/api/sacred-geometry/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["pattern"], body["data"]["pattern"]);

    // Unknown id yields the error envelope
    let (status, missing) =
        make_request(&app, "GET", "/api/sacred-geometry/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["status"], "error");
    assert_eq!(missing["message"], "Meditation not found");
}

#[tokio::test]
async fn test_cosmic_affirmation_and_category_listing() {
    let app = test_app();

    let (status, body) = make_request(
        &app,
        "POST",
        "/api/affirmations/cosmic",
        None,
        Some(json!({"intention": "growth", "lifeArea": "career"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "cosmic_affirmation");
    assert!(body["awakening_code"].as_str().unwrap().starts_with("CCA-"));
    let factors = body["data"]["personalization_factors"].as_array().unwrap();
    assert_eq!(factors.len(), 2);

    let category = body["data"]["category"].as_str().unwrap().to_string();
    let (status, listing) = make_request(
        &app,
        "GET",
        &format!("/api/affirmations/category/{}", category),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);
    assert_eq!(listing["data"][0]["text"], body["data"]["text"]);
}

#[tokio::test]
async fn test_galactic_soundscape_synthesis_and_listing() {
    let app = test_app();

    let (status, body) = make_request(
        &app,
        "POST",
        "/api/chants/galactic/synthesize",
        None,
        Some(json!({"type": "pulsar", "duration": 480})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "galactic_soundscape");
    assert_eq!(body["data"]["galactic_type"], "pulsar");
    assert_eq!(body["data"]["duration"], 480);
    assert!(body["data"]["audio_params"]["filter"].is_string());
    assert!(body["awakening_code"].as_str().unwrap().starts_with("GCS-PUL"));

    let (status, listing) = make_request(&app, "GET", "/api/chants/galactic", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_neural_pattern_activation_and_listing() {
    let app = test_app();

    let (status, body) = make_request(
        &app,
        "GET",
        "/api/neural/pathways/activate?consciousness_state=alpha_wave",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "neural_pattern_activation");
    assert_eq!(body["data"]["pattern_type"], "alpha_wave");
    assert!(body["data"]["visualization_data"]["nodes"].is_array());
    assert!(body["awakening_code"].as_str().unwrap().starts_with("NPA-"));

    let (status, listing) =
        make_request(&app, "GET", "/api/neural/patterns/alpha_wave", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_heart_galaxy_requires_heart_rate() {
    let app = test_app();

    let (status, body) =
        make_request(&app, "POST", "/api/heart-galaxy/connect", None, Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Heart rate is required and must be a number");
}

#[tokio::test]
async fn test_heart_galaxy_connection_and_user_listing() {
    let app = test_app();

    let (status, body) = make_request(
        &app,
        "POST",
        "/api/heart-galaxy/connect",
        Some("u1"),
        Some(json!({"heart_rate": 65, "session_duration": 120})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "heart_galaxy_connection");
    assert_eq!(body["data"]["heart_rate"], 65);
    assert_eq!(body["data"]["biometric_harmony"], "optimal");
    assert_eq!(body["data"]["session_duration"], 120);

    let coherence = body["data"]["coherence_level"].as_i64().unwrap();
    assert!((0..=100).contains(&coherence));
    assert!(["synchronized", "aligning", "seeking"]
        .contains(&body["data"]["galaxy_sync_status"].as_str().unwrap()));
    assert!(["strong", "moderate", "developing"]
        .contains(&body["data"]["connection_strength"].as_str().unwrap()));

    // Listing requires the caller identity
    let (status, _) = make_request(&app, "GET", "/api/heart-galaxy/sessions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, listing) =
        make_request(&app, "GET", "/api/heart-galaxy/sessions", Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_round_trip_history_and_deletion() {
    let app = test_app();

    // Missing message is rejected before any session is created
    let (status, body) = make_request(&app, "POST", "/api/chat", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Message is required and must be a string");

    let (status, first) = make_request(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({"message": "how do theta waves work?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["type"], "chat_response");
    assert!(first["awakening_code"].as_str().unwrap().starts_with("NGC-"));

    let session_id = first["data"]["session_id"].as_str().unwrap().to_string();
    assert!(session_id.starts_with("chat-"));

    // Second turn threads into the same session
    let (status, _) = make_request(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({"message": "tell me more", "sessionId": session_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, history) = make_request(
        &app,
        "GET",
        &format!("/api/chat/{}/history", session_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = history["data"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");

    // Deletion cascades; the history is gone afterwards
    let (status, deleted) = make_request(
        &app,
        "DELETE",
        &format!("/api/chat/{}", session_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["status"], "success");

    let (status, _) = make_request(
        &app,
        "GET",
        &format!("/api/chat/{}/history", session_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_dedup_and_removal() {
    let app = test_app();

    // Identity required
    let (status, _) = make_request(
        &app,
        "POST",
        "/api/favorites",
        None,
        Some(json!({"entity_type": "meditation", "entity_id": "m1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown entity type rejected
    let (status, body) = make_request(
        &app,
        "POST",
        "/api/favorites",
        Some("u1"),
        Some(json!({"entity_type": "playlist", "entity_id": "m1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let favorite = json!({"entity_type": "meditation", "entity_id": "m1"});
    let (status, created) = make_request(
        &app,
        "POST",
        "/api/favorites",
        Some("u1"),
        Some(favorite.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let favorite_id = created["data"]["id"].as_str().unwrap().to_string();

    // Same triple twice is a conflict, and no second row appears
    let (status, dup) =
        make_request(&app, "POST", "/api/favorites", Some("u1"), Some(favorite)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup["message"], "Already favorited");

    let (_, listing) = make_request(&app, "GET", "/api/favorites", Some("u1"), None).await;
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);

    // Another user's removal attempt does not match
    let (status, _) = make_request(
        &app,
        "DELETE",
        &format!("/api/favorites/{}", favorite_id),
        Some("u2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = make_request(
        &app,
        "DELETE",
        &format!("/api/favorites/{}", favorite_id),
        Some("u1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = make_request(&app, "GET", "/api/favorites", Some("u1"), None).await;
    assert!(listing["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preferences_upsert_merges_fields() {
    let app = test_app();

    let (status, body) = make_request(&app, "GET", "/api/preferences", Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, body) = make_request(
        &app,
        "PUT",
        "/api/preferences",
        Some("u1"),
        Some(json!({"preferred_duration": 900})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["preferred_duration"], 900);
    assert_eq!(body["data"]["default_intensity"], 5.0);

    // A later partial update keeps the earlier field
    let (status, body) = make_request(
        &app,
        "PUT",
        "/api/preferences",
        Some("u1"),
        Some(json!({"default_intensity": 7.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["preferred_duration"], 900);
    assert_eq!(body["data"]["default_intensity"], 7.5);

    // Range validation
    let (status, _) = make_request(
        &app,
        "PUT",
        "/api/preferences",
        Some("u1"),
        Some(json!({"preferred_duration": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_user_provisioning() {
    let app = test_app();

    let (status, _) = make_request(&app, "GET", "/api/auth/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Identity without profile claims and no stored row
    let (status, _) = make_request(&app, "GET", "/api/auth/user", Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Profile claims provision the row
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/user")
        .header("x-user-id", "u1")
        .header("x-user-name", "stargazer")
        .header("x-user-email", "stargazer@example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["username"], "stargazer");

    // Afterwards the bare identity resolves
    let (status, body) = make_request(&app, "GET", "/api/auth/user", Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "stargazer@example.com");
}
