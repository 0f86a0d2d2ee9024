use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{ChatMessage, LlmClient};
use crate::util::SecretString;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Shared chat-completion wire types (OpenAI-style)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    /// Hint the endpoint to emit a single JSON object, non-streaming.
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ============================================================================
// Azure OpenAI Client
// ============================================================================

pub struct AzureOpenAIClient {
    api_key: SecretString,
    endpoint: String,
    deployment: String,
    api_version: String,
    max_tokens: u32,
    client: Client,
}

impl AzureOpenAIClient {
    pub fn new(
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
        max_tokens: u32,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment,
            api_version,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .context("failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl LlmClient for AzureOpenAIClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        // Azure routes the model via the deployment path segment, not the body
        let request = ChatCompletionRequest {
            model: None,
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
            response_format: ResponseFormat::json_object(),
        };

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        );
        debug!("Calling Azure OpenAI deployment: {}", self.deployment);

        let response = self
            .client
            .post(&url)
            .header("api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Azure OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Azure OpenAI API error {}: {}", status, error_text);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse Azure OpenAI API response")?;

        api_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .context("No choices in Azure OpenAI response")
    }
}

// ============================================================================
// OpenAI Client (also serves OpenAI-compatible endpoints via base_url)
// ============================================================================

pub struct OpenAIClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Result<Self> {
        Self::with_base_url(
            api_key,
            model,
            "https://api.openai.com/v1".to_string(),
            max_tokens,
        )
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .context("failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: Some(self.model.clone()),
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
            response_format: ResponseFormat::json_object(),
        };

        debug!(
            "Calling OpenAI-compatible API at {} with model: {}",
            self.base_url, self.model
        );

        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request);

        // Only add authorization if API key is not empty
        if !self.api_key.is_empty() && self.api_key.expose().to_lowercase() != "none" {
            req = req.header("authorization", format!("Bearer {}", self.api_key.expose()));
        }

        let response = req
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, error_text);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        api_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .context("No choices in OpenAI response")
    }
}

// ============================================================================
// Tests
// ============================================================================
