use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::user::{ProfessionalProfile, ProfessionalUpdateRequest};

/// `PUT /api/perfil-profissional`
pub async fn update_professional(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfessionalUpdateRequest>, JsonRejection>,
) -> Result<Json<ProfessionalProfile>, ApiError> {
    let Json(request) = payload?;
    let update = request.validate().map_err(ApiError::validation)?;

    let profile = state.profile_service().update_professional(&update).await?;
    Ok(Json(profile))
}

/// `GET /api/profissionais`
pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProfessionalProfile>>, ApiError> {
    let profiles = state.profile_service().list_professionals().await?;
    Ok(Json(profiles))
}
