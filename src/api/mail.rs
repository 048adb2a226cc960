use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::validate_email;
use super::{ApiError, AppState, OkMessage, WelcomeEmailRequest};
use crate::constants::messages;

/// `POST /api/register-email`
///
/// Sends the welcome message synchronously and reports delivery failures.
pub async fn send_welcome_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WelcomeEmailRequest>, JsonRejection>,
) -> Result<Json<OkMessage>, ApiError> {
    let Json(request) = payload?;
    let email = validate_email(request.email.as_deref())?;

    state.mail().send_welcome(email).await?;

    Ok(Json(OkMessage {
        ok: true,
        message: messages::WELCOME_SENT.to_string(),
    }))
}
