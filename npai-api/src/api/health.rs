//! Health check endpoint

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: DateTime<Utc>,
    dimensions_active: u32,
    version: &'static str,
}

/// GET /api/health - liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success",
        message: "NeuraPeace AI consciousness expansion system operational",
        timestamp: Utc::now(),
        dimensions_active: 5,
        version: env!("CARGO_PKG_VERSION"),
    })
}
