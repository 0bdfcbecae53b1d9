//! Ranking endpoint.
//!
//! `POST /api/rank` normalizes the submitted symptoms, ranks them with the
//! configured backend and returns the top `k` candidate conditions.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{BackendKind, MatchResult, SymptomContext};
use crate::session::QueryOutcome;

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub context: SymptomContext,
    pub k: Option<usize>,
    /// Requests sharing a `client_id` supersede one another.
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub backend: BackendKind,
    pub results: Vec<MatchResult>,
}

/// `POST /api/rank`
pub async fn rank(
    State(ctx): State<ApiContext>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankResponse>, ApiError> {
    let Json(request) = payload?;
    let client_id = request
        .client_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    tracing::debug!(
        symptoms = request.symptoms.len(),
        k = ?request.k,
        tracked = client_id.is_some(),
        "Rank request"
    );

    let session = ctx.session_for(client_id)?;
    match session
        .submit(request.symptoms, request.context, request.k)
        .await?
    {
        QueryOutcome::Completed(results) => Ok(Json(RankResponse {
            backend: ctx.engine.backend_kind(),
            results,
        })),
        QueryOutcome::Superseded => Err(ApiError::Superseded),
    }
}

/// `DELETE /api/sessions/:client_id`: drop the client's in-flight query.
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let known = ctx.cancel_session(&client_id)?;
    tracing::debug!(known, "Cancel request");
    Ok(StatusCode::NO_CONTENT)
}
