use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::college::CollegeRecord;
use crate::recommendations::validation::{validate_query, RecommendationRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub count: usize,
    pub colleges: Vec<CollegeRecord>,
}

#[derive(Debug, Serialize)]
pub struct CollegeListResponse {
    pub colleges: Vec<CollegeRecord>,
}

/// POST /api/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(req) = payload?;
    let query = validate_query(&req).map_err(|e| AppError::Validation(e.to_string()))?;

    let colleges = state
        .colleges
        .find_colleges(&query)
        .await?;

    tracing::debug!(
        rank = query.rank,
        marks = query.marks,
        course = %query.course,
        count = colleges.len(),
        "Recommendations computed"
    );

    Ok(Json(RecommendationResponse {
        count: colleges.len(),
        colleges,
    }))
}

/// GET /api/colleges
pub async fn handle_list_colleges(
    State(state): State<AppState>,
) -> Result<Json<CollegeListResponse>, AppError> {
    let colleges = state.colleges.list_colleges().await?;
    Ok(Json(CollegeListResponse { colleges }))
}
