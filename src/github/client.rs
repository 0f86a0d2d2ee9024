use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

use super::models::{GithubRepo, GithubUser};
use crate::util::SecretString;

const PER_PAGE: u32 = 100;

/// Error from the user-lookup call. Distinguishes "the platform reported the
/// user does not exist" (recoverable: the pipeline logs it and continues with
/// an empty match list) from transport faults (fatal).
#[derive(Debug, thiserror::Error)]
pub enum UserLookupError {
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Thin client for a GitHub-compatible REST API, consumed read-only.
/// Holds an optional personal access token; anonymous handles work the same
/// but run under lower rate limits.
pub struct GithubClient {
    base_url: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl GithubClient {
    /// Build a handle. The credential is passed in explicitly — callers read
    /// it from the environment exactly once at startup.
    pub fn new(base_url: String, token: Option<String>) -> Result<Self> {
        if token.is_some() {
            info!("Authenticated with GitHub token.");
        } else {
            info!("No GitHub token found. Using anonymous access.");
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(SecretString::new),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                // GitHub rejects requests without a User-Agent
                .user_agent(concat!("gitwrap/", env!("CARGO_PKG_VERSION")))
                .build()
                .context("failed to build HTTP client")?,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/vnd.github+json"));
        if let Some(ref token) = self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token.expose())) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Resolve a username to a user resource.
    pub async fn get_user(&self, username: &str) -> Result<GithubUser, UserLookupError> {
        let url = format!("{}/users/{}", self.base_url, username);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .with_context(|| format!("request failed for user '{}'", username))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UserLookupError::NotFound(username.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UserLookupError::Other(anyhow::anyhow!(
                "GitHub API error {} for user '{}': {}",
                status,
                username,
                body
            )));
        }

        let user = response
            .json::<GithubUser>()
            .await
            .context("failed to parse user response")?;
        Ok(user)
    }

    /// Enumerate all public repositories of a user. Pagination is explicit:
    /// pages of up to 100 are fetched until a short page arrives. A failure on
    /// any page aborts the enumeration — no partial results are returned.
    pub async fn list_public_repos(&self, username: &str) -> Result<Vec<GithubRepo>> {
        let mut repos = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}/users/{}/repos?type=public&per_page={}&page={}",
                self.base_url, username, PER_PAGE, page
            );
            debug!("GET {}", url);

            let response = self
                .client
                .get(&url)
                .headers(self.headers())
                .send()
                .await
                .with_context(|| format!("request failed listing repos for '{}'", username))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                bail!("GitHub API error {} listing repos: {}", status, body);
            }

            let batch: Vec<GithubRepo> = response
                .json()
                .await
                .context("failed to parse repository list")?;

            let batch_len = batch.len();
            repos.extend(batch);

            if batch_len < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} public repos for '{}'", repos.len(), username);
        Ok(repos)
    }
}
