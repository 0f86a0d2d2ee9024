use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter criteria for one run. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct SearchParameters {
    pub username: String,
    pub language: String,
    pub min_stars: u32,
    pub updated_within_months: u32,
}

/// GitHub user resource, as returned by `GET /users/{username}`.
/// Only the fields the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub public_repos: u32,
}

/// Repository resource from `GET /users/{username}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only projection of a matching repository. This is the shape that gets
/// serialized into the completion prompt, so field names are part of the
/// prompt contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub language: String,
    /// "YYYY-MM-DD"
    pub updated_at: String,
    pub url: String,
}

impl RepositorySummary {
    /// Project a raw API repository into the transient summary record.
    /// Callers have already verified the language predicate, so a missing
    /// language cannot occur here; default to empty rather than panic.
    pub fn from_repo(repo: &GithubRepo) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo.description.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language.clone().unwrap_or_default(),
            updated_at: repo.updated_at.format("%Y-%m-%d").to_string(),
            url: repo.html_url.clone(),
        }
    }
}
