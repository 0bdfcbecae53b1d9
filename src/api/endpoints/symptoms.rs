//! Symptom lookup endpoint for search-as-you-type inputs.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

pub const DEFAULT_SUGGEST_LIMIT: usize = 10;
pub const MAX_SUGGEST_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// `GET /api/symptoms/suggest?q=..&limit=..`
pub async fn suggest(
    State(ctx): State<ApiContext>,
    params: Result<Query<SuggestQuery>, QueryRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let Query(params) = params?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SUGGEST_LIMIT)
        .min(MAX_SUGGEST_LIMIT);

    let catalog = ctx.engine.catalog();
    let suggestions = ctx
        .engine
        .suggest(&params.q, limit)
        .into_iter()
        .map(|symptom| Suggestion {
            label: catalog.label(&symptom).unwrap_or(symptom.as_str()).to_string(),
            id: symptom.as_str().to_string(),
        })
        .collect();

    Ok(Json(SuggestResponse { suggestions }))
}
