//! Neural pathway activation endpoints

use crate::api::{awakening_code, AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use npai_common::db::models::{NeuralPattern, NewNeuralPattern};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_STATE: &str = "theta_gamma_sync";

#[derive(Debug, Deserialize)]
pub struct ActivateQuery {
    #[serde(alias = "consciousnessState")]
    pub consciousness_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NeuralActivationResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: NeuralActivationData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NeuralActivationData {
    pattern_id: String,
    pattern_type: String,
    brain_waves: Value,
    visualization_data: Value,
    activation_sequence: Value,
}

/// GET /api/neural/pathways/activate - generate and persist a pattern
pub async fn activate(
    State(ctx): State<AppContext>,
    Query(query): Query<ActivateQuery>,
) -> Result<Json<NeuralActivationResponse>> {
    let consciousness_state = query
        .consciousness_state
        .unwrap_or_else(|| DEFAULT_STATE.to_string());

    let data = ctx
        .generator
        .neural_pattern(&consciousness_state)
        .await
        .map_err(|e| Error::upstream("Failed to generate neural activation pattern", e))?;

    let code = awakening_code("NPA", &data.pattern_type);

    let brain_waves = serde_json::to_value(&data.brain_waves)
        .map_err(|e| Error::upstream("Payload serialization failed", e))?;
    let visualization_data = serde_json::to_value(&data.visualization_data)
        .map_err(|e| Error::upstream("Payload serialization failed", e))?;
    let activation_sequence = serde_json::to_value(&data.activation_sequence)
        .map_err(|e| Error::upstream("Payload serialization failed", e))?;

    let pattern = ctx
        .storage
        .create_neural_pattern(NewNeuralPattern {
            pattern_type: data.pattern_type,
            brain_waves,
            visualization_data,
            activation_sequence,
        })
        .await?;

    Ok(Json(NeuralActivationResponse {
        status: "success",
        kind: "neural_pattern_activation",
        data: NeuralActivationData {
            pattern_id: pattern.id,
            pattern_type: pattern.pattern_type,
            brain_waves: pattern.brain_waves,
            visualization_data: pattern.visualization_data,
            activation_sequence: pattern.activation_sequence,
        },
        awakening_code: code,
        next_evolution: "/api/heart-galaxy/connect",
    }))
}

/// GET /api/neural/patterns/:type - list stored patterns of one type
pub async fn list_by_type(
    State(ctx): State<AppContext>,
    Path(pattern_type): Path<String>,
) -> Result<Json<DataEnvelope<Vec<NeuralPattern>>>> {
    let patterns = ctx.storage.list_neural_patterns_by_type(&pattern_type).await?;
    Ok(Json(DataEnvelope::success(patterns)))
}
