//! gitwrap - Festive GitHub repository showcase generator
//!
//! A linear four-stage pipeline: connect to the GitHub API, filter a user's
//! public repositories by language/stars/recency, ask a chat-completion
//! endpoint for festive "gift entry" copy, and inject the result into an HTML
//! template written to a timestamped file. Supports Azure OpenAI, OpenAI, and
//! OpenAI-compatible completion endpoints.

pub mod cli;
pub mod config;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod util;
