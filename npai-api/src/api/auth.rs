//! Caller identity extraction (external auth collaborator boundary)
//!
//! Authentication itself is out of scope; an upstream proxy authenticates
//! the user and forwards the identity as trusted headers. `X-User-Id` is
//! required on identity-bearing routes; `X-User-Name` / `X-User-Email` are
//! optional profile claims used to provision the user row on first sight.

use crate::api::{AppContext, DataEnvelope};
use crate::error::{Error, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::HeaderMap, request::Parts},
    Json,
};
use chrono::Utc;
use npai_common::db::models::User;
use std::convert::Infallible;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Authenticated caller identity; rejects with 401 when the header is
/// missing or unreadable
pub struct UserId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| UserId(v.to_string()))
            .ok_or(Error::Unauthorized)
    }
}

/// Caller identity for routes that work anonymously
pub struct OptionalUserId(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OptionalUserId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Infallible> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(OptionalUserId(user_id))
    }
}

/// GET /api/auth/user - current user row
///
/// Provisions the row when the auth proxy supplies profile claims;
/// otherwise the user must already exist.
pub async fn get_current_user(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    headers: HeaderMap,
) -> Result<Json<DataEnvelope<User>>> {
    let username = headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let email = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let (Some(username), Some(email)) = (username, email) {
        ctx.storage
            .upsert_user(User {
                id: user_id.clone(),
                username,
                email,
                created_at: Utc::now(),
            })
            .await?;
    }

    match ctx.storage.get_user(&user_id).await? {
        Some(user) => Ok(Json(DataEnvelope::success(user))),
        None => Err(Error::NotFound("User not found".to_string())),
    }
}
