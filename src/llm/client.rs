use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One message in a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion endpoint: given a conversation, returns one generated
/// text response. Implementations request a JSON-formatted, non-streaming
/// completion.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        // Echo a well-formed giftsData object so the rest of the pipeline can
        // run end-to-end without network access.
        let username = messages
            .iter()
            .find_map(|m| {
                m.content
                    .lines()
                    .find(|l| l.starts_with("GitHub username: "))
                    .map(|l| l.trim_start_matches("GitHub username: ").to_string())
            })
            .unwrap_or_else(|| "octocat".to_string());

        Ok(format!(
            r#"{{"giftsData": [{{
    "repoNumber": 1,
    "name": "mock-repo",
    "description": "🎄 A festive mock favorite, wrapped with care!",
    "imageUrl": "https://github.com/{username}.png",
    "repoUrl": "https://github.com/{username}/mock-repo"
}}]}}"#
        ))
    }
}
