use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::GeminiConfig;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if the model produced any.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Sampling limits for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent("MindFlow/1.0");
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            client,
            endpoint: Self::endpoint(&config.base_url, &config.model)?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(base_url: &str, model: &str) -> Result<Url> {
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        Url::parse(&url).with_context(|| format!("Invalid Gemini endpoint: {url}"))
    }

    /// Sends a single-turn prompt and returns the model's text, if any.
    ///
    /// One attempt only; a non-success status is an error carrying the response body.
    pub async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<Option<String>> {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: options.max_output_tokens,
                temperature: options.temperature,
            },
        };

        debug!(
            "Calling Gemini ({} prompt chars, max {} tokens)",
            prompt.chars().count(),
            options.max_output_tokens
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {status}: {text}");
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to decode Gemini response")?;

        Ok(parsed.first_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let url = GeminiClient::endpoint(
            "https://generativelanguage.googleapis.com/",
            "gemini-2.5-flash-lite",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: "olá" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 256,
                temperature: 0.5,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "olá");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_first_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Respire fundo."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Respire fundo."));
    }

    #[test]
    fn test_first_text_missing() {
        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.first_text().is_none());

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(blocked.first_text().is_none());

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert!(blank.first_text().is_none());
    }
}
