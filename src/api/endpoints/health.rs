//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::BackendKind;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: BackendKind,
    pub conditions: usize,
    pub symptoms: usize,
    pub session_id: String,
    pub started_at: String,
}

/// `GET /api/health`: liveness plus the loaded knowledge snapshot.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        backend: ctx.engine.backend_kind(),
        conditions: ctx.engine.knowledge_base().len(),
        symptoms: ctx.engine.catalog().len(),
        session_id: ctx.session_id.clone(),
        started_at: ctx.started_at.clone(),
    })
}
