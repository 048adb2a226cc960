//! Domain service for professional profiles and the screening questionnaire.

use thiserror::Error;

use crate::models::assessment::ScreeningAnswers;
use crate::models::user::{ProfessionalProfile, ProfessionalUpdate};
use crate::services::assistant_service::AssistantError;

/// Errors specific to profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<AssistantError> for ProfileError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Validation(msg) => Self::Validation(msg),
            AssistantError::Upstream(msg) => Self::Upstream(msg),
        }
    }
}

/// Domain service trait for profiles.
#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Updates a professional's public attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] when no professional has this id; nothing is written.
    async fn update_professional(
        &self,
        update: &ProfessionalUpdate,
    ) -> Result<ProfessionalProfile, ProfileError>;

    /// Lists every professional for the public directory.
    async fn list_professionals(&self) -> Result<Vec<ProfessionalProfile>, ProfileError>;

    /// Summarizes the answers with the assistant and stores the summary on the user.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] for an unknown user, before the assistant is called.
    /// Returns [`ProfileError::Upstream`] if the assistant fails; nothing is stored then.
    async fn submit_assessment(
        &self,
        user_id: i32,
        answers: &ScreeningAnswers,
    ) -> Result<String, ProfileError>;
}
