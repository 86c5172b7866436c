//! User favorites endpoints
//!
//! Uniqueness over (user, entity_type, entity_id) is checked before insert
//! and backed by a storage-level constraint; a lost race still surfaces as
//! a conflict, not a duplicate row.

use crate::api::auth::UserId;
use crate::api::{AppContext, DataEnvelope, MessageEnvelope};
use crate::error::{Error, Result};
use axum::{
    extract::{Path, State},
    Json,
};
use npai_common::db::models::{NewFavorite, UserFavorite};
use serde::Deserialize;

const ENTITY_TYPES: [&str; 4] = ["meditation", "affirmation", "soundscape", "neural_pattern"];

#[derive(Debug, Default, Deserialize)]
pub struct AddFavoriteRequest {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

/// POST /api/favorites - add a favorite
pub async fn add(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    body: Option<Json<AddFavoriteRequest>>,
) -> Result<Json<DataEnvelope<UserFavorite>>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let Some(entity_type) = request.entity_type else {
        return Err(Error::Validation("entity_type is required".to_string()));
    };
    let Some(entity_id) = request.entity_id.filter(|id| !id.is_empty()) else {
        return Err(Error::Validation("entity_id is required".to_string()));
    };

    if !ENTITY_TYPES.contains(&entity_type.as_str()) {
        return Err(Error::Validation(format!(
            "entity_type must be one of: {}",
            ENTITY_TYPES.join(", ")
        )));
    }

    if ctx
        .storage
        .find_favorite(&user_id, &entity_type, &entity_id)
        .await?
        .is_some()
    {
        return Err(Error::Conflict("Already favorited".to_string()));
    }

    let favorite = ctx
        .storage
        .create_favorite(NewFavorite {
            user_id,
            entity_type,
            entity_id,
        })
        .await
        .map_err(|e| match e {
            npai_common::Error::InvalidInput(_) => {
                Error::Conflict("Already favorited".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(DataEnvelope::success(favorite)))
}

/// GET /api/favorites - the caller's favorites
pub async fn list(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
) -> Result<Json<DataEnvelope<Vec<UserFavorite>>>> {
    let favorites = ctx.storage.list_favorites(&user_id).await?;
    Ok(Json(DataEnvelope::success(favorites)))
}

/// DELETE /api/favorites/:id - remove one favorite
pub async fn remove(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<MessageEnvelope>> {
    if !ctx.storage.delete_favorite(&user_id, &id).await? {
        return Err(Error::NotFound("Favorite not found".to_string()));
    }
    Ok(Json(MessageEnvelope::success("Favorite removed")))
}
