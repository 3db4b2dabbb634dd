//! Text generation boundary.
//!
//! `TextGenerator` is the seam the strategy and hashtag operations call;
//! `GeminiClient` implements it against the Gemini `generateContent` REST API
//! with the key held server-side.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    constants::GENERATION_TIMEOUT_SECS,
    error::AppError,
    utils::Config,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the model's text reply.
    async fn generate(&self, prompt: &str, config: Option<GenerationConfig>) -> Result<String, AppError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, config: Option<GenerationConfig>) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalService("AI generator is not available. Please try again later.".to_string()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest::new(prompt, config);

        debug!("Sending {} prompt characters to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                AppError::ExternalService("Failed to reach the AI generator.".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Gemini returned {}: {}", status, detail);
            return Err(AppError::ExternalService("The AI generator returned an error.".to_string()));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AppError::ExternalService("The AI generator returned an unreadable response.".to_string())
        })?;

        parsed
            .first_text()
            .ok_or_else(|| AppError::ExternalService("The AI generator returned no text.".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn new(prompt: &str, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest::new(
            "hello",
            Some(GenerationConfig {
                temperature: 0.5,
                top_k: 40,
                top_p: 0.5,
                max_output_tokens: 1024,
            }),
        );
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(value["generationConfig"]["temperature"], 0.5);

        let bare = serde_json::to_value(GenerateContentRequest::new("hi", None)).unwrap();
        assert!(bare.get("generationConfig").is_none());
    }

    #[test]
    fn test_first_text_extraction() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("first"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.first_text().is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert!(blocked.first_text().is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_external_failure() {
        let client = GeminiClient::new(None, "gemini-1.5-flash", "http://127.0.0.1:9").unwrap();
        let result = client.generate("prompt", None).await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
