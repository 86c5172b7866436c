//! Cosmic affirmation endpoints

use crate::api::{awakening_code, AppContext, DataEnvelope};
use crate::error::{Error, Result};
use crate::generator::types::AffirmationInput;
use axum::{
    extract::{Path, State},
    Json,
};
use npai_common::db::models::{Affirmation, NewAffirmation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CosmicAffirmationRequest {
    pub intention: Option<String>,
    #[serde(alias = "lifeArea")]
    pub life_area: Option<String>,
    pub personality: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CosmicAffirmationResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: CosmicAffirmationData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CosmicAffirmationData {
    affirmation_id: String,
    text: String,
    category: String,
    vibrational_frequency: i64,
    cosmic_alignment: String,
    personalization_factors: Vec<String>,
}

/// POST /api/affirmations/cosmic - generate and persist an affirmation
pub async fn generate(
    State(ctx): State<AppContext>,
    body: Option<Json<CosmicAffirmationRequest>>,
) -> Result<Json<CosmicAffirmationResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let input = AffirmationInput {
        intention: request.intention,
        life_area: request.life_area,
        personality: request.personality,
    };

    let data = ctx
        .generator
        .cosmic_affirmation(&input)
        .await
        .map_err(|e| Error::upstream("Failed to generate cosmic affirmation", e))?;

    let code = awakening_code("CCA", &data.category);

    let affirmation = ctx
        .storage
        .create_affirmation(NewAffirmation {
            text: data.text,
            category: data.category,
            vibrational_frequency: data.vibrational_frequency,
            cosmic_alignment: data.cosmic_alignment,
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(CosmicAffirmationResponse {
        status: "success",
        kind: "cosmic_affirmation",
        data: CosmicAffirmationData {
            affirmation_id: affirmation.id,
            text: affirmation.text,
            category: affirmation.category,
            vibrational_frequency: affirmation.vibrational_frequency,
            cosmic_alignment: affirmation.cosmic_alignment,
            personalization_factors: data.personalization_factors,
        },
        awakening_code: code,
        next_evolution: "/api/heart-galaxy/connect",
    }))
}

/// GET /api/affirmations/category/:category - list stored affirmations
pub async fn list_by_category(
    State(ctx): State<AppContext>,
    Path(category): Path<String>,
) -> Result<Json<DataEnvelope<Vec<Affirmation>>>> {
    let affirmations = ctx.storage.list_affirmations_by_category(&category).await?;
    Ok(Json(DataEnvelope::success(affirmations)))
}
