//! User preferences endpoints

use crate::api::auth::UserId;
use crate::api::{AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{extract::State, Json};
use chrono::Utc;
use npai_common::db::models::UserPreferences;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_PREFERRED_DURATION: i64 = 1200;
const DEFAULT_INTENSITY: f64 = 5.0;

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferred_duration: Option<i64>,
    pub default_intensity: Option<f64>,
    pub settings: Option<Value>,
}

/// GET /api/preferences - the caller's preferences, or null if never set
pub async fn get_preferences(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
) -> Result<Json<DataEnvelope<Option<UserPreferences>>>> {
    let prefs = ctx.storage.get_preferences(&user_id).await?;
    Ok(Json(DataEnvelope::success(prefs)))
}

/// PUT /api/preferences - upsert the caller's preferences
pub async fn update_preferences(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    body: Option<Json<UpdatePreferencesRequest>>,
) -> Result<Json<DataEnvelope<UserPreferences>>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    if let Some(duration) = request.preferred_duration {
        if !(60..=7200).contains(&duration) {
            return Err(Error::Validation(
                "preferred_duration must be between 60 and 7200 seconds".to_string(),
            ));
        }
    }
    if let Some(intensity) = request.default_intensity {
        if !(1.0..=10.0).contains(&intensity) {
            return Err(Error::Validation(
                "default_intensity must be between 1 and 10".to_string(),
            ));
        }
    }

    // Unspecified fields keep their stored value, or the defaults on first write
    let existing = ctx.storage.get_preferences(&user_id).await?;
    let (current_duration, current_intensity, current_settings) = match existing {
        Some(prefs) => (prefs.preferred_duration, prefs.default_intensity, prefs.settings),
        None => (DEFAULT_PREFERRED_DURATION, DEFAULT_INTENSITY, None),
    };

    let prefs = ctx
        .storage
        .upsert_preferences(UserPreferences {
            user_id,
            preferred_duration: request.preferred_duration.unwrap_or(current_duration),
            default_intensity: request.default_intensity.unwrap_or(current_intensity),
            settings: request.settings.or(current_settings),
            updated_at: Utc::now(),
        })
        .await?;

    Ok(Json(DataEnvelope::success(prefs)))
}
