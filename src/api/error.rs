use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use crate::constants::messages;
use crate::services::{AssistantError, AuthError, MailError, ProfileError};

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    /// Uniqueness violation; reported as 400 like any other bad input.
    Conflict(String),

    Unauthorized(String),

    NotFound(String),

    RateLimited { retry_after: u64 },

    /// AI or mail provider failure. `public` is shown to the client, `detail` is only logged.
    ExternalApiError {
        public: &'static str,
        detail: String,
    },

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::RateLimited { retry_after } => {
                write!(f, "Rate limited, retry after {retry_after}s")
            }
            Self::ExternalApiError { detail, .. } => write!(f, "Upstream error: {detail}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::ValidationError(msg) | Self::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                messages::RATE_LIMITED.to_string(),
            ),
            Self::ExternalApiError { public, detail } => {
                tracing::error!("Upstream error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, (*public).to_string())
            }
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::INTERNAL.to_string(),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::INTERNAL.to_string(),
                )
            }
        };

        let mut response = (status, Json(ErrorBody::new(error_message))).into_response();
        if let Self::RateLimited { retry_after } = self
            && let Ok(value) = HeaderValue::from_str(&retry_after.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(format!("{err:#}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(format!("JSON inválido: {}", rejection.body_text()))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::ValidationError(msg),
            AuthError::Conflict(field) => Self::Conflict(field.conflict_message().to_string()),
            AuthError::DuplicateAccount => Self::Conflict(messages::ACCOUNT_TAKEN.to_string()),
            AuthError::InvalidCredentials => {
                Self::Unauthorized(messages::BAD_CREDENTIALS.to_string())
            }
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(msg) => Self::NotFound(msg.to_string()),
            ProfileError::Validation(msg) => Self::ValidationError(msg),
            ProfileError::Upstream(detail) => Self::assistant(detail),
            ProfileError::Database(msg) => Self::DatabaseError(msg),
            ProfileError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Validation(msg) => Self::ValidationError(msg),
            AssistantError::Upstream(detail) => Self::assistant(detail),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::InvalidRecipient(_) => Self::validation(messages::INVALID_EMAIL),
            MailError::Disabled | MailError::Delivery(_) => Self::mail(err.to_string()),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn assistant(detail: impl Into<String>) -> Self {
        Self::ExternalApiError {
            public: messages::AI_FAILURE,
            detail: detail.into(),
        }
    }

    pub fn mail(detail: impl Into<String>) -> Self {
        Self::ExternalApiError {
            public: messages::MAIL_FAILURE,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UniqueField;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::validation("x"), StatusCode::BAD_REQUEST),
            (
                ApiError::from(AuthError::Conflict(UniqueField::Email)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::from(ProfileError::NotFound(messages::USER_NOT_FOUND)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::RateLimited { retry_after: 5 },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (ApiError::assistant("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::from(MailError::Disabled),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(AuthError::Database("gone".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after: 42 }.into_response();
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }
}
