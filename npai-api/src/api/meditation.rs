//! Meditation session phase engine endpoints
//!
//! Thin handlers: caller identity plus request body in, engine outcome out.
//! All six routes require the authenticated caller identity.

use crate::api::auth::UserId;
use crate::api::{AppContext, DataEnvelope};
use crate::error::{Error, Result};
use crate::session::engine::{FeedbackSubmission, StartRequest};
use crate::session::phases::{MeditationPhase, PhaseGuidance, SessionStatus};
use axum::{
    extract::{Path, State},
    Json,
};
use npai_common::db::models::{MeditationSession, SessionEventRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct StartBody {
    pub meditation_id: Option<String>,
    pub soundscape_id: Option<String>,
    pub neural_pattern_id: Option<String>,
    pub target_duration: Option<i64>,
    pub config: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct StartData {
    pub session: MeditationSession,
    pub guidance: Vec<PhaseGuidance>,
}

/// POST /api/meditation/start
pub async fn start(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    body: Option<Json<StartBody>>,
) -> Result<Json<DataEnvelope<StartData>>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let started = ctx
        .engine
        .start(
            &user_id,
            StartRequest {
                meditation_id: body.meditation_id,
                soundscape_id: body.soundscape_id,
                neural_pattern_id: body.neural_pattern_id,
                target_duration: body.target_duration,
                config: body.config,
            },
        )
        .await?;

    Ok(Json(DataEnvelope::success(StartData {
        session: started.session,
        guidance: started.guidance,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvanceBody {
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdvanceData {
    pub session_id: String,
    pub status: SessionStatus,
    pub current_phase: MeditationPhase,
    pub progress_percent: u32,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
}

/// POST /api/meditation/:session_id/phase/advance
pub async fn advance_phase(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    Path(session_id): Path<String>,
    body: Option<Json<AdvanceBody>>,
) -> Result<Json<DataEnvelope<AdvanceData>>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let advance = ctx
        .engine
        .advance_phase(&user_id, &session_id, body.feedback)
        .await?;

    Ok(Json(DataEnvelope::success(AdvanceData {
        session_id: advance.session_id,
        status: advance.status,
        current_phase: advance.phase,
        progress_percent: advance.progress_percent,
        completed: advance.completed,
        actual_duration: advance.actual_duration,
    })))
}

#[derive(Debug, Serialize)]
pub struct StatusData {
    pub session_id: String,
    pub status: SessionStatus,
    pub current_phase: Option<MeditationPhase>,
}

/// POST /api/meditation/:session_id/pause
pub async fn pause(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    Path(session_id): Path<String>,
) -> Result<Json<DataEnvelope<StatusData>>> {
    let session = ctx.engine.pause(&user_id, &session_id).await?;
    Ok(Json(DataEnvelope::success(StatusData {
        session_id: session.id,
        status: session.status,
        current_phase: session.current_phase,
    })))
}

/// POST /api/meditation/:session_id/resume
pub async fn resume(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    Path(session_id): Path<String>,
) -> Result<Json<DataEnvelope<StatusData>>> {
    let session = ctx.engine.resume(&user_id, &session_id).await?;
    Ok(Json(DataEnvelope::success(StatusData {
        session_id: session.id,
        status: session.status,
        current_phase: session.current_phase,
    })))
}

#[derive(Debug, Deserialize)]
pub struct BiometricData {
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackBody {
    pub feedback_type: Option<String>,
    pub value: Option<f64>,
    pub biometric_data: Option<BiometricData>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackData {
    pub adaptation_applied: bool,
    pub intensity: f64,
}

/// POST /api/meditation/:session_id/feedback
pub async fn feedback(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
    Path(session_id): Path<String>,
    body: Option<Json<FeedbackBody>>,
) -> Result<Json<DataEnvelope<FeedbackData>>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let Some(feedback_type) = body.feedback_type else {
        return Err(Error::Validation("feedback_type is required".to_string()));
    };
    let Some(value) = body.value else {
        return Err(Error::Validation("value is required".to_string()));
    };

    let result = ctx
        .engine
        .submit_feedback(
            &user_id,
            &session_id,
            FeedbackSubmission {
                feedback_type,
                value,
                heart_rate: body.biometric_data.and_then(|b| b.heart_rate),
            },
        )
        .await?;

    Ok(Json(DataEnvelope::success(FeedbackData {
        adaptation_applied: result.adaptation_applied,
        intensity: result.intensity,
    })))
}

#[derive(Debug, Serialize)]
pub struct CurrentData {
    pub session: MeditationSession,
    pub progress_percent: u32,
    pub recent_events: Vec<SessionEventRecord>,
}

/// GET /api/meditation/current - running session with recent events, or null
pub async fn current(
    State(ctx): State<AppContext>,
    UserId(user_id): UserId,
) -> Result<Json<DataEnvelope<Option<CurrentData>>>> {
    let current = ctx.engine.current(&user_id).await?.map(|c| CurrentData {
        session: c.session,
        progress_percent: c.progress_percent,
        recent_events: c.recent_events,
    });

    Ok(Json(DataEnvelope::success(current)))
}
