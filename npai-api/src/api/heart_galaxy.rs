//! Heart-galaxy connection endpoints
//!
//! The one experience computed locally rather than via the LLM: coherence
//! is derived from heart-rate deviation with simulated variability jitter.

use crate::api::auth::{OptionalUserId, UserId};
use crate::api::{awakening_code, AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{extract::State, Json};
use npai_common::db::models::{HeartGalaxySession, NewHeartGalaxySession};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_SESSION_DURATION: i64 = 300;

/// Resting-rate anchor used for both coherence and harmony classification
const BASELINE_HEART_RATE: f64 = 65.0;

const CONSTELLATIONS: [&str; 5] = ["Andromeda", "Pleiades", "Sirius", "Vega", "Arcturus"];

#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    pub heart_rate: Option<f64>,
    pub session_duration: Option<i64>,
    pub meditation_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeartGalaxyResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: HeartGalaxyData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HeartGalaxyData {
    session_id: String,
    heart_rate: i64,
    coherence_level: i64,
    galaxy_sync_status: String,
    cosmic_coordinates: Value,
    session_duration: i64,
    connection_strength: &'static str,
    biometric_harmony: &'static str,
}

/// POST /api/heart-galaxy/connect - establish a biometric connection session
pub async fn connect(
    State(ctx): State<AppContext>,
    OptionalUserId(user_id): OptionalUserId,
    body: Option<Json<ConnectRequest>>,
) -> Result<Json<HeartGalaxyResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let Some(heart_rate) = request.heart_rate else {
        return Err(Error::Validation(
            "Heart rate is required and must be a number".to_string(),
        ));
    };

    // ThreadRng is !Send; confine it to a block so it is out of scope before
    // the await below, keeping the handler future Send.
    let (coherence_level, galaxy_sync_status, cosmic_coordinates) = {
        let mut rng = rand::thread_rng();

        // Coherence from heart rate variability simulation
        let jitter: f64 = rng.gen::<f64>() * 20.0;
        let coherence_level = (100.0 - (heart_rate - BASELINE_HEART_RATE).abs() * 2.0 + jitter)
            .round()
            .clamp(0.0, 100.0) as i64;

        let galaxy_sync_status = if coherence_level > 70 {
            "synchronized"
        } else if coherence_level > 40 {
            "aligning"
        } else {
            "seeking"
        };

        let cosmic_coordinates = json!({
            "galactic_longitude": rng.gen::<f64>() * 360.0,
            "galactic_latitude": (rng.gen::<f64>() - 0.5) * 180.0,
            "distance_from_center": rng.gen::<f64>() * 50000.0,
            "constellation": CONSTELLATIONS.choose(&mut rng).unwrap(),
        });

        (coherence_level, galaxy_sync_status, cosmic_coordinates)
    };

    let session = ctx
        .storage
        .create_heart_galaxy_session(NewHeartGalaxySession {
            user_id: user_id.unwrap_or_else(|| "anonymous".to_string()),
            meditation_session_id: request.meditation_session_id,
            heart_rate: heart_rate.round() as i64,
            coherence_level,
            galaxy_sync_status: galaxy_sync_status.to_string(),
            cosmic_coordinates,
            session_duration: request.session_duration.unwrap_or(DEFAULT_SESSION_DURATION),
        })
        .await?;

    let connection_strength = if coherence_level > 80 {
        "strong"
    } else if coherence_level > 50 {
        "moderate"
    } else {
        "developing"
    };

    let biometric_harmony = if (60.0..=100.0).contains(&heart_rate) {
        "optimal"
    } else {
        "adjusting"
    };

    let code = awakening_code("HGC", &session.galaxy_sync_status);

    Ok(Json(HeartGalaxyResponse {
        status: "success",
        kind: "heart_galaxy_connection",
        data: HeartGalaxyData {
            session_id: session.id,
            heart_rate: session.heart_rate,
            coherence_level: session.coherence_level,
            galaxy_sync_status: session.galaxy_sync_status,
            cosmic_coordinates: session.cosmic_coordinates,
            session_duration: session.session_duration,
            connection_strength,
            biometric_harmony,
        },
        awakening_code: code,
        next_evolution: "/api/sacred-geometry/generate",
    }))
}

/// GET /api/heart-galaxy/sessions - the caller's stored sessions
pub async fn list_sessions(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
) -> Result<Json<DataEnvelope<Vec<HeartGalaxySession>>>> {
    let sessions = ctx
        .storage
        .list_heart_galaxy_sessions_by_user(&user_id)
        .await?;
    Ok(Json(DataEnvelope::success(sessions)))
}
