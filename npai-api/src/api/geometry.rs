//! Sacred geometry meditation endpoints

use crate::api::{awakening_code, AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use npai_common::db::models::{Meditation, NewMeditation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Seconds; matches the generator default when the client omits a duration
const DEFAULT_DURATION: i64 = 1260;

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub intention: Option<String>,
    pub duration: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SacredGeometryResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: SacredGeometryData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SacredGeometryData {
    meditation_id: String,
    pattern: String,
    duration: i64,
    frequencies: Value,
    geometry_sequence: Value,
    neural_targets: Value,
    consciousness_level: String,
    guided_text: String,
}

/// GET /api/sacred-geometry/generate - generate and persist a meditation
pub async fn generate(
    State(ctx): State<AppContext>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<SacredGeometryResponse>> {
    let duration = query.duration.unwrap_or(DEFAULT_DURATION);

    let data = ctx
        .generator
        .sacred_geometry_meditation(query.intention.as_deref(), duration)
        .await
        .map_err(|e| Error::upstream("Failed to generate sacred geometry meditation", e))?;

    let code = awakening_code("SGM", &data.pattern);

    let meditation = ctx
        .storage
        .create_meditation(NewMeditation {
            pattern: data.pattern,
            duration: data.duration,
            frequencies: encode(&data.frequencies)?,
            geometry_sequence: encode(&data.geometry_sequence)?,
            neural_targets: encode(&data.neural_targets)?,
            consciousness_level: data.consciousness_level,
            awakening_code: code.clone(),
        })
        .await?;

    Ok(Json(SacredGeometryResponse {
        status: "success",
        kind: "sacred_geometry_meditation",
        data: SacredGeometryData {
            meditation_id: meditation.id,
            pattern: meditation.pattern,
            duration: meditation.duration,
            frequencies: meditation.frequencies,
            geometry_sequence: meditation.geometry_sequence,
            neural_targets: meditation.neural_targets,
            consciousness_level: meditation.consciousness_level,
            guided_text: data.guided_text,
        },
        awakening_code: code,
        next_evolution: "/api/neural/pathways/activate",
    }))
}

/// GET /api/sacred-geometry/:id - fetch a stored meditation
pub async fn get_by_id(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<Meditation>>> {
    match ctx.storage.get_meditation(&id).await? {
        Some(meditation) => Ok(Json(DataEnvelope::success(meditation))),
        None => Err(Error::NotFound("Meditation not found".to_string())),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::upstream("Payload serialization failed", e))
}
