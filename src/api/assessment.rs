use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, AppState, AssessmentResponse};
use crate::constants::messages;
use crate::models::assessment::AssessmentRequest;

/// `POST /api/questionario`
///
/// Summarizes the screening answers and stores the summary on the user. The
/// same text is returned so the client can show it right away.
pub async fn submit_assessment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let Json(request) = payload?;
    let (user_id, answers) = request.validate().map_err(ApiError::validation)?;

    let summary = state
        .profile_service()
        .submit_assessment(user_id, &answers)
        .await?;

    Ok(Json(AssessmentResponse {
        message: messages::ASSESSMENT_SAVED.to_string(),
        resumo_pre_avaliacao: summary,
    }))
}
