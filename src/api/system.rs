//! Liveness and database diagnostics.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::{AppState, DbStatus};
use crate::constants::messages;

/// `GET /health`
pub async fn health() -> &'static str {
    messages::SERVICE_ONLINE
}

/// `GET /db-status`
///
/// Asks the database for its clock, which proves a full round trip.
pub async fn db_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store().current_timestamp().await {
        Ok(now) => (
            StatusCode::OK,
            Json(DbStatus {
                status: messages::DB_OK.to_string(),
                hora_atual_db: Some(now),
                detalhe: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Database status check failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbStatus {
                    status: messages::DB_DOWN.to_string(),
                    hora_atual_db: None,
                    detalhe: Some(format!("{e:#}")),
                }),
            )
        }
    }
}
