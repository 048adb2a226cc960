use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::validation::validate_credentials;
use super::{ApiError, AppState, CreatedResponse, LoginRequest};
use crate::models::user::{ProfileView, RegisterRequest};

/// `POST /api/register`
///
/// Creates a patient or professional account depending on `tipo`. The welcome
/// email goes out in the background and never affects the response.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let id = state.auth_service().register(&request).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `POST /api/login`
///
/// Unknown account and wrong password produce the same 401 body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ProfileView>, ApiError> {
    let Json(request) = payload?;
    let (login, password) =
        validate_credentials(request.identifier(), request.password.as_deref())?;

    let view = state.auth_service().login(login, password).await?;
    tracing::Span::current().record("user_id", view.id);

    Ok(Json(view))
}
