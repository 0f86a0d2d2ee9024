pub mod client;
pub mod models;

pub use client::{GithubClient, UserLookupError};
pub use models::{GithubRepo, GithubUser, RepositorySummary, SearchParameters};
