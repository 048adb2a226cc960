//! Gemini-backed implementation of the `AssistantService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::clients::gemini::{GeminiClient, GenerationOptions};
use crate::config::GeminiConfig;
use crate::constants::messages;
use crate::models::assessment::ScreeningAnswers;
use crate::services::assistant_service::{
    AssistantError, AssistantService, assessment_prompt, chat_prompt, strip_markdown,
};

pub struct GeminiAssistantService {
    client: GeminiClient,
    chat_options: GenerationOptions,
    summary_options: GenerationOptions,
}

impl GeminiAssistantService {
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: GeminiClient::new(config)?,
            chat_options: GenerationOptions {
                max_output_tokens: config.max_output_tokens,
                temperature: config.temperature,
            },
            summary_options: GenerationOptions {
                max_output_tokens: config.summary_max_output_tokens,
                temperature: config.temperature,
            },
        })
    }
}

#[async_trait]
impl AssistantService for GeminiAssistantService {
    async fn chat(&self, message: &str) -> Result<String, AssistantError> {
        if message.trim().is_empty() {
            return Err(AssistantError::Validation(messages::EMPTY_MESSAGE.to_string()));
        }

        let reply = self
            .client
            .generate(&chat_prompt(message), self.chat_options)
            .await?;

        Ok(reply.map_or_else(
            || {
                warn!("Gemini returned no text for a chat message");
                messages::AI_NO_REPLY.to_string()
            },
            |text| strip_markdown(&text),
        ))
    }

    async fn summarize_assessment(
        &self,
        answers: &ScreeningAnswers,
    ) -> Result<String, AssistantError> {
        if answers.is_empty() {
            return Err(AssistantError::Validation(messages::EMPTY_ANSWERS.to_string()));
        }

        let summary = self
            .client
            .generate(&assessment_prompt(answers), self.summary_options)
            .await?
            .ok_or_else(|| AssistantError::Upstream("Gemini returned no summary".to_string()))?;

        Ok(strip_markdown(&summary))
    }
}
