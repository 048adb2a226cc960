//! Domain service for the generative-language assistant.
//!
//! Builds the prompts for the support chat and the pre-assessment summary
//! and cleans up model output before it reaches the browser.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::prompts;
use crate::models::assessment::ScreeningAnswers;

/// Errors specific to assistant operations.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Upstream(String),
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        Self::Upstream(format!("{err:#}"))
    }
}

/// Domain service trait for the assistant.
#[async_trait::async_trait]
pub trait AssistantService: Send + Sync {
    /// Answers a user's chat message.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Validation`] for a blank message, before any provider call.
    /// Returns [`AssistantError::Upstream`] when the provider call fails.
    async fn chat(&self, message: &str) -> Result<String, AssistantError>;

    /// Writes a pre-assessment summary of the screening answers.
    async fn summarize_assessment(
        &self,
        answers: &ScreeningAnswers,
    ) -> Result<String, AssistantError>;
}

#[must_use]
pub fn chat_prompt(message: &str) -> String {
    format!("{}\nUsuário: {}", prompts::CHAT_PREAMBLE, message.trim())
}

#[must_use]
pub fn assessment_prompt(answers: &ScreeningAnswers) -> String {
    format!(
        "{}\n\nRespostas do questionário:\n{}",
        prompts::ASSESSMENT_PREAMBLE,
        answers.to_lines().join("\n")
    )
}

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Removes Markdown syntax the chat widget would otherwise print literally.
#[must_use]
pub fn strip_markdown(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    static HEADING: OnceLock<Regex> = OnceLock::new();
    static BULLET: OnceLock<Regex> = OnceLock::new();
    static BOLD: OnceLock<Regex> = OnceLock::new();
    static UNDERLINE_BOLD: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    let text = get_regex(&FENCE, r"```[A-Za-z0-9_-]*").replace_all(text, "");
    let text = get_regex(&HEADING, r"(?m)^[ \t]{0,3}#{1,6}[ \t]*").replace_all(&text, "");
    let text = get_regex(&BULLET, r"(?m)^([ \t]*)[*+][ \t]+").replace_all(&text, "$1- ");
    let text = get_regex(&BOLD, r"\*\*(.+?)\*\*").replace_all(&text, "$1");
    let text = get_regex(&UNDERLINE_BOLD, r"__(.+?)__").replace_all(&text, "$1");
    let text = text.replace(['*', '`'], "");
    let text = get_regex(&BLANK_LINES, r"\n{3,}").replace_all(&text, "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_prompt_wraps_message() {
        let prompt = chat_prompt("  estou ansioso  ");
        assert!(prompt.starts_with(prompts::CHAT_PREAMBLE));
        assert!(prompt.ends_with("Usuário: estou ansioso"));
    }

    #[test]
    fn test_assessment_prompt_embeds_answers() {
        let answers: ScreeningAnswers =
            serde_json::from_value(json!({"humor": "triste", "sono": 4})).unwrap();
        let prompt = assessment_prompt(&answers);
        assert!(prompt.starts_with(prompts::ASSESSMENT_PREAMBLE));
        assert!(prompt.contains("- humor: triste"));
        assert!(prompt.contains("- sono: 4"));
    }

    #[test]
    fn test_strip_markdown() {
        let raw = "## Dica\n**Respire** fundo e *relaxe*.\n* beba água\n+ caminhe\n\n\n\n`pausa`";
        assert_eq!(
            strip_markdown(raw),
            "Dica\nRespire fundo e relaxe.\n- beba água\n- caminhe\n\npausa"
        );
    }

    #[test]
    fn test_strip_markdown_fences_and_plain_text() {
        assert_eq!(strip_markdown("```text\nolá\n```"), "olá");
        assert_eq!(strip_markdown("Tudo bem - sem formatação."), "Tudo bem - sem formatação.");
        assert_eq!(strip_markdown("__importante__ e snake_case"), "importante e snake_case");
    }
}
