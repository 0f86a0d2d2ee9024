use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::github::{GithubClient, GithubRepo, RepositorySummary, SearchParameters, UserLookupError};

/// Stage 2: fetch a user's public repositories and keep the ones matching the
/// language, star-count, and recency criteria.
pub struct Collector<'a> {
    client: &'a GithubClient,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Resolve the user and return the filtered summaries in API enumeration
    /// order. An unknown user is logged and yields an empty list; a network
    /// failure during enumeration is fatal.
    pub async fn collect(&self, params: &SearchParameters) -> Result<Vec<RepositorySummary>> {
        let user = match self.client.get_user(&params.username).await {
            Ok(user) => user,
            Err(UserLookupError::NotFound(name)) => {
                warn!("Error fetching user '{}': not found", name);
                return Ok(Vec::new());
            }
            Err(UserLookupError::Other(e)) => {
                warn!("Error fetching user '{}': {}", params.username, e);
                return Ok(Vec::new());
            }
        };

        info!(
            "Resolved user '{}' ({} public repos)",
            user.login, user.public_repos
        );

        let repos = self.client.list_public_repos(&params.username).await?;
        let matches = filter_repos(&repos, params, Utc::now());

        if matches.is_empty() {
            info!(
                "No repositories match the given criteria for user '{}'.",
                params.username
            );
        } else {
            info!(
                "Found {} matching repositories for user '{}': {}",
                matches.len(),
                params.username,
                matches
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(matches)
    }
}

/// Apply the three predicates in order: exact language match, stars at or
/// above the minimum, updated at or after the cutoff (now minus 30 days per
/// configured month). Both numeric boundaries are inclusive. Enumeration
/// order is preserved; nothing is sorted.
pub fn filter_repos(
    repos: &[GithubRepo],
    params: &SearchParameters,
    now: DateTime<Utc>,
) -> Vec<RepositorySummary> {
    let since = now - Duration::days(30 * i64::from(params.updated_within_months));

    repos
        .iter()
        .filter(|repo| repo.language.as_deref() == Some(params.language.as_str()))
        .filter(|repo| repo.stargazers_count >= params.min_stars)
        .filter(|repo| repo.updated_at >= since)
        .map(RepositorySummary::from_repo)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo(name: &str, language: Option<&str>, stars: u32, updated: DateTime<Utc>) -> GithubRepo {
        GithubRepo {
            name: name.to_string(),
            description: None,
            html_url: format!("https://github.com/acme/{}", name),
            stargazers_count: stars,
            forks_count: 0,
            language: language.map(str::to_string),
            updated_at: updated,
        }
    }

    fn params() -> SearchParameters {
        SearchParameters {
            username: "acme".to_string(),
            language: "Python".to_string(),
            min_stars: 1,
            updated_within_months: 12,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_language_mismatch_excluded() {
        let repos = vec![
            repo("py", Some("Python"), 5, now()),
            repo("js", Some("JavaScript"), 100, now()),
        ];
        let matches = filter_repos(&repos, &params(), now());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "py");
    }

    #[test]
    fn test_missing_language_excluded() {
        let repos = vec![repo("none", None, 5, now())];
        assert!(filter_repos(&repos, &params(), now()).is_empty());
    }

    #[test]
    fn test_star_boundary_inclusive() {
        let mut p = params();
        p.min_stars = 3;
        let repos = vec![
            repo("below", Some("Python"), 2, now()),
            repo("exact", Some("Python"), 3, now()),
            repo("above", Some("Python"), 4, now()),
        ];
        let matches = filter_repos(&repos, &p, now());
        let names: Vec<_> = matches.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["exact", "above"]);
    }

    #[test]
    fn test_recency_boundary_inclusive() {
        let p = params();
        let cutoff = now() - Duration::days(30 * 12);
        let repos = vec![
            repo("stale", Some("Python"), 5, cutoff - Duration::seconds(1)),
            repo("boundary", Some("Python"), 5, cutoff),
            repo("fresh", Some("Python"), 5, now()),
        ];
        let matches = filter_repos(&repos, &p, now());
        let names: Vec<_> = matches.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["boundary", "fresh"]);
    }

    #[test]
    fn test_enumeration_order_preserved() {
        // Not sorted by stars or date: API order is kept as-is
        let repos = vec![
            repo("small", Some("Python"), 1, now()),
            repo("big", Some("Python"), 500, now()),
            repo("medium", Some("Python"), 50, now()),
        ];
        let matches = filter_repos(&repos, &params(), now());
        let names: Vec<_> = matches.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["small", "big", "medium"]);
    }

    #[test]
    fn test_mixed_language_listing_keeps_only_match() {
        // One Python repo with 5 stars updated 10 days ago, one JavaScript
        // repo with 100 stars: only the Python repo survives.
        let repos = vec![
            repo("python-repo", Some("Python"), 5, now() - Duration::days(10)),
            repo("js-repo", Some("JavaScript"), 100, now()),
        ];
        let matches = filter_repos(&repos, &params(), now());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "python-repo");
        assert_eq!(matches[0].stars, 5);
    }

    #[tokio::test]
    async fn test_collect_unknown_user_returns_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/ghost")
            .with_status(404)
            .create_async()
            .await;

        let client = GithubClient::new(server.url(), None).unwrap();
        let collector = Collector::new(&client);
        let mut p = params();
        p.username = "ghost".to_string();
        let matches = collector.collect(&p).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_collect_enumeration_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/acme")
            .with_status(200)
            .with_body(r#"{"login": "acme", "public_repos": 1}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/users/acme/repos")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = GithubClient::new(server.url(), None).unwrap();
        let collector = Collector::new(&client);
        let result = collector.collect(&params()).await;
        assert!(result.is_err());
    }
}
