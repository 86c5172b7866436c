//! Galactic soundscape endpoints

use crate::api::{awakening_code, AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{extract::State, Json};
use npai_common::db::models::{NewSoundscape, Soundscape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_TYPE: &str = "cosmic_harmony";
const DEFAULT_DURATION: i64 = 600;

#[derive(Debug, Default, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(rename = "type")]
    pub soundscape_type: Option<String>,
    pub duration: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SoundscapeResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: SoundscapeResponseData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SoundscapeResponseData {
    soundscape_id: String,
    name: String,
    frequencies: Value,
    duration: i64,
    galactic_type: String,
    audio_params: Value,
}

/// POST /api/chants/galactic/synthesize - generate and persist a soundscape
pub async fn synthesize(
    State(ctx): State<AppContext>,
    body: Option<Json<SynthesizeRequest>>,
) -> Result<Json<SoundscapeResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let soundscape_type = request
        .soundscape_type
        .unwrap_or_else(|| DEFAULT_TYPE.to_string());
    let duration = request.duration.unwrap_or(DEFAULT_DURATION);

    let data = ctx
        .generator
        .galactic_soundscape(&soundscape_type, duration)
        .await
        .map_err(|e| Error::upstream("Failed to generate galactic soundscape", e))?;

    let code = awakening_code("GCS", &data.galactic_type);

    let frequencies = serde_json::to_value(&data.frequencies)
        .map_err(|e| Error::upstream("Payload serialization failed", e))?;
    let audio_params = serde_json::to_value(&data.audio_params)
        .map_err(|e| Error::upstream("Payload serialization failed", e))?;

    let soundscape = ctx
        .storage
        .create_soundscape(NewSoundscape {
            name: data.name,
            frequencies,
            duration: data.duration,
            galactic_type: data.galactic_type,
            audio_params,
        })
        .await?;

    Ok(Json(SoundscapeResponse {
        status: "success",
        kind: "galactic_soundscape",
        data: SoundscapeResponseData {
            soundscape_id: soundscape.id,
            name: soundscape.name,
            frequencies: soundscape.frequencies,
            duration: soundscape.duration,
            galactic_type: soundscape.galactic_type,
            audio_params: soundscape.audio_params,
        },
        awakening_code: code,
        next_evolution: "/api/neural/pathways/activate",
    }))
}

/// GET /api/chants/galactic - list all stored soundscapes
pub async fn list_all(
    State(ctx): State<AppContext>,
) -> Result<Json<DataEnvelope<Vec<Soundscape>>>> {
    let soundscapes = ctx.storage.list_soundscapes().await?;
    Ok(Json(DataEnvelope::success(soundscapes)))
}
