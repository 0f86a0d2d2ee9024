use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::github::RepositorySummary;
use crate::llm::client::{ChatMessage, LlmClient};
use crate::llm::prompts;

/// One featured repository in the rendered page: a generated display record
/// with festive copy. Field names are camelCase on the wire — they feed
/// straight into the page template's JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftEntry {
    pub repo_number: u32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub repo_url: String,
}

/// The completion endpoint's output shape is not under our control; parse
/// failures get a distinct kind so callers can tell a bad response apart
/// from transport faults.
#[derive(Debug, thiserror::Error)]
pub enum GiftResponseError {
    #[error("completion response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("completion response has no 'giftsData' key")]
    MissingGiftsData,
    #[error("'giftsData' entries do not match the gift-entry schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Strip JSON code fences from output (```json ... ``` or ```...```).
/// Models sometimes wrap the object despite the json_object response format.
fn strip_json_fences(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .and_then(|s| s.strip_suffix("```"))
    {
        return inner.trim();
    }

    if let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|s| s.strip_suffix("```"))
    {
        return inner.trim();
    }

    trimmed
}

/// Parse the raw completion text into typed gift entries.
pub fn parse_gifts_response(raw: &str) -> Result<Vec<GiftEntry>, GiftResponseError> {
    let value: serde_json::Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(GiftResponseError::Malformed)?;

    let gifts = value
        .get("giftsData")
        .ok_or(GiftResponseError::MissingGiftsData)?;

    serde_json::from_value(gifts.clone()).map_err(GiftResponseError::Schema)
}

/// Stage 3: send the filtered repository list to the completion endpoint and
/// parse the generated gift entries. The prompt instructs the model to pick
/// at most 6 favorites; that bound is not enforced here.
pub struct GiftGenerator {
    client: Box<dyn LlmClient>,
}

impl GiftGenerator {
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        username: &str,
        repos: &[RepositorySummary],
    ) -> Result<Vec<GiftEntry>> {
        let repos_json =
            serde_json::to_string(repos).context("failed to serialize repository list")?;

        let messages = vec![
            ChatMessage::system(prompts::system_instruction()),
            ChatMessage::user(prompts::response_template(username)),
            ChatMessage::user(prompts::context_message(&repos_json)),
            ChatMessage::user(prompts::reinforce_json_object()),
        ];

        info!("Requesting gift copy for {} repositories", repos.len());
        let raw = self.client.complete(&messages).await?;

        // Raw model output goes to stdout, before any parsing
        println!("ho, ho, ho! Merry Christmas!");
        println!("{}", raw);

        let gifts = parse_gifts_response(&raw)?;
        info!("Parsed {} gift entries", gifts.len());
        Ok(gifts)
    }
}
