//! AI chat assistant endpoints
//!
//! A chat session row is created on demand when the first message arrives
//! without a session id. Messages are append-only; deleting a session
//! cascades to its messages.

use crate::api::auth::OptionalUserId;
use crate::api::{awakening_code_untagged, new_chat_session_id, AppContext, DataEnvelope, MessageEnvelope};
use crate::error::{Error, Result};
use crate::generator::types::ChatTurn;
use axum::{
    extract::{Path, State},
    Json,
};
use npai_common::db::models::{ChatMessage, NewChatMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    status: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: ChatResponseData,
    awakening_code: String,
    next_evolution: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseData {
    response: String,
    context_references: Vec<String>,
    suggested_actions: Vec<String>,
    session_id: String,
}

/// POST /api/chat - one chat turn
pub async fn send_message(
    State(ctx): State<AppContext>,
    OptionalUserId(user_id): OptionalUserId,
    body: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let Some(message) = request.message.filter(|m| !m.trim().is_empty()) else {
        return Err(Error::Validation(
            "Message is required and must be a string".to_string(),
        ));
    };

    let session_id = request.session_id.unwrap_or_else(new_chat_session_id);
    ctx.storage
        .get_or_create_chat_session(&session_id, user_id.as_deref())
        .await?;

    // Prior turns give the model conversational context
    let history: Vec<ChatTurn> = ctx
        .storage
        .list_chat_messages(&session_id)
        .await?
        .into_iter()
        .map(|m| ChatTurn {
            role: m.role,
            content: m.content,
        })
        .collect();

    let reply = ctx
        .generator
        .chat_response(&message, &history)
        .await
        .map_err(|e| Error::upstream("Failed to process chat message", e))?;

    ctx.storage
        .append_chat_message(NewChatMessage {
            chat_session_id: session_id.clone(),
            role: "user".to_string(),
            content: message,
        })
        .await?;

    ctx.storage
        .append_chat_message(NewChatMessage {
            chat_session_id: session_id.clone(),
            role: "assistant".to_string(),
            content: reply.content.clone(),
        })
        .await?;

    Ok(Json(ChatResponse {
        status: "success",
        kind: "chat_response",
        data: ChatResponseData {
            response: reply.content,
            context_references: reply.context_references,
            suggested_actions: reply.suggested_actions,
            session_id,
        },
        awakening_code: awakening_code_untagged("NGC"),
        next_evolution: "/api/neural/pathways/activate",
    }))
}

/// GET /api/chat/:session_id/history - ordered messages of one session
pub async fn history(
    State(ctx): State<AppContext>,
    Path(session_id): Path<String>,
) -> Result<Json<DataEnvelope<Vec<ChatMessage>>>> {
    if ctx.storage.get_chat_session(&session_id).await?.is_none() {
        return Err(Error::NotFound("Chat session not found".to_string()));
    }

    let messages = ctx.storage.list_chat_messages(&session_id).await?;
    Ok(Json(DataEnvelope::success(messages)))
}

/// DELETE /api/chat/:session_id - delete a session and its messages
pub async fn delete_session(
    State(ctx): State<AppContext>,
    Path(session_id): Path<String>,
) -> Result<Json<MessageEnvelope>> {
    if !ctx.storage.delete_chat_session(&session_id).await? {
        return Err(Error::NotFound("Chat session not found".to_string()));
    }
    Ok(Json(MessageEnvelope::success("Chat session deleted")))
}
