//! `SeaORM` implementation of the `ProfileService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::constants::messages;
use crate::db::Store;
use crate::models::assessment::ScreeningAnswers;
use crate::models::user::{ProfessionalProfile, ProfessionalUpdate};
use crate::services::assistant_service::AssistantService;
use crate::services::profile_service::{ProfileError, ProfileService};

pub struct SeaOrmProfileService {
    store: Store,
    assistant: Arc<dyn AssistantService>,
}

impl SeaOrmProfileService {
    #[must_use]
    pub fn new(store: Store, assistant: Arc<dyn AssistantService>) -> Self {
        Self { store, assistant }
    }
}

#[async_trait]
impl ProfileService for SeaOrmProfileService {
    async fn update_professional(
        &self,
        update: &ProfessionalUpdate,
    ) -> Result<ProfessionalProfile, ProfileError> {
        let row = self
            .store
            .update_professional(update)
            .await?
            .ok_or(ProfileError::NotFound(messages::PROFESSIONAL_NOT_FOUND))?;

        info!(user_id = row.id, "Professional profile updated");
        Ok(ProfessionalProfile::from(row))
    }

    async fn list_professionals(&self) -> Result<Vec<ProfessionalProfile>, ProfileError> {
        let rows = self.store.list_professionals().await?;
        Ok(rows.into_iter().map(ProfessionalProfile::from).collect())
    }

    async fn submit_assessment(
        &self,
        user_id: i32,
        answers: &ScreeningAnswers,
    ) -> Result<String, ProfileError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(ProfileError::NotFound(messages::USER_NOT_FOUND));
        }

        let summary = self.assistant.summarize_assessment(answers).await?;

        // The row may have vanished while the assistant was working
        if !self.store.set_assessment_summary(user_id, &summary).await? {
            return Err(ProfileError::NotFound(messages::USER_NOT_FOUND));
        }

        info!(user_id, "Pre-assessment summary stored");
        Ok(summary)
    }
}
