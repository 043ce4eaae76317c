//! OpenAI-backed converter
//!
//! Sends the locally normalized text through Chat Completions and asks for
//! Markdown back. The result is trimmed and otherwise used as-is.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{TextConverter, structural_text};
use crate::config::{LlmConfig, OPENAI_KEY_ENV};
use crate::source::{SourceDocument, TableMode};
use crate::types::{DocError, Result};

const SYSTEM_PROMPT: &str = "You are a document converter that transforms document content into clean, well-formatted Markdown.
Follow these rules:
1. Maintain the document structure (headings, lists, etc.)
2. Preserve all content and formatting
3. Use proper Markdown syntax
4. Handle special elements like code blocks, tables, and links correctly
5. Return only the converted Markdown without any explanations";

pub struct OpenAiConverter {
    /// Never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConverter")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiConverter {
    /// Build from settings, reading the key from `OPENAI_API_KEY`
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            DocError::Config(format!(
                "OpenAI API key not found. Set {} to enable LLM conversion",
                OPENAI_KEY_ENV
            ))
        })?;
        Self::new(config, api_key)
    }

    pub fn new(config: &LlmConfig, api_key: SecretString) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, content: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Convert this document content to Markdown:\n\n{}", content),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl TextConverter for OpenAiConverter {
    async fn convert(&self, doc: &SourceDocument) -> Result<String> {
        info!(
            "Converting '{}' with OpenAI (model: {}, temperature: {})",
            doc.title, self.model, self.temperature
        );

        let content = structural_text(doc, TableMode::Placeholder);
        let request = self.build_request(&content);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| DocError::Convert(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocError::Convert(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DocError::Convert(format!("Failed to parse OpenAI response: {}", e)))?;

        let markdown = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocError::Convert("No content in OpenAI response".to_string()))?;

        debug!("Received {} characters from OpenAI", markdown.len());
        Ok(markdown.trim().to_string())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
