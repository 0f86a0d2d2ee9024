use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    /// Endpoint base URL. Required for "azure" (the resource endpoint) and
    /// "openai-compatible"; ignored for "openai".
    #[serde(default)]
    pub base_url: Option<String>,
    /// Azure REST API version (query parameter). Only used by the "azure" provider.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Optional: Override max_tokens for LLM requests
    /// If not specified, uses provider-specific defaults:
    /// - azure / openai: 4096
    /// - openai-compatible (ollama): 16384
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }

        match self.provider.as_str() {
            "azure" => 4096,
            "openai" => 4096,
            "openai-compatible" => 16384, // ollama and similar
            _ => 4096,                    // Safe default
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub-compatible REST API
    #[serde(default = "default_github_api")]
    pub api_url: String,
    /// Environment variable holding the personal access token. Anonymous
    /// access (lower rate limits) when the variable is unset.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// HTML template containing the ___GIFTS_DATA___ placeholder
    #[serde(default = "default_template")]
    pub template: String,
    /// Output filename prefix; the second-resolution timestamp is appended
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

/// Default search parameters, overridable per-run from the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_min_stars")]
    pub min_stars: u32,
    #[serde(default = "default_months")]
    pub updated_within_months: u32,
}

fn default_api_version() -> String {
    "2024-10-21".to_string()
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_template() -> String {
    "githubber.html".to_string()
}

fn default_prefix() -> String {
    "thats-a-wrap-".to_string()
}

fn default_language() -> String {
    "Python".to_string()
}

fn default_min_stars() -> u32 {
    1
}

fn default_months() -> u32 {
    12
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: Some("AZURE_OPENAI_API_KEY".to_string()),
            base_url: None,
            api_version: default_api_version(),
            max_tokens: None,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            token_env: default_token_env(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            prefix: default_prefix(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            min_stars: default_min_stars(),
            updated_within_months: default_months(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            github: GithubConfig::default(),
            output: OutputConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load config from repo root or user config directory
    #[allow(dead_code)]
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try working directory first (per-project config)
        if let Ok(config) = Self::load_from_path("gitwrap.toml") {
            debug!("Loaded config from ./gitwrap.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("gitwrap").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the completion-endpoint API key from the environment variable named
    /// in config. Missing keys surface here, before any network call.
    pub fn get_api_key(&self) -> Result<String> {
        match &self.llm.api_key_env {
            Some(env_var) => {
                // Special case: "none" means no API key needed (e.g., Ollama)
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }

                // openai-compatible: try env var but don't error if missing
                // (local models like Ollama don't need keys, but gateways do)
                if self.llm.provider == "openai-compatible" {
                    return Ok(env::var(env_var).unwrap_or_default());
                }

                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()),
        }
    }

    /// Read the GitHub token from the environment. `None` means anonymous
    /// access; no validation that the credential is well-formed — failures
    /// surface later when API calls are made.
    pub fn github_token(&self) -> Option<String> {
        env::var(&self.github.token_env).ok().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "azure");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_version, "2024-10-21");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.output.template, "githubber.html");
        assert_eq!(config.output.prefix, "thats-a-wrap-");
        assert_eq!(config.search.language, "Python");
        assert_eq!(config.search.min_stars, 1);
        assert_eq!(config.search.updated_within_months, 12);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"azure\""));
        assert!(toml_str.contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
"#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.output.prefix, "thats-a-wrap-");
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        env::set_var("GITWRAP_TEST_API_KEY", "test_key_123");
        let mut config = Config::default();
        config.llm.api_key_env = Some("GITWRAP_TEST_API_KEY".to_string());

        let api_key = config.get_api_key().unwrap();
        assert_eq!(api_key, "test_key_123");

        env::remove_var("GITWRAP_TEST_API_KEY");
    }

    #[test]
    fn test_api_key_missing_fails() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("GITWRAP_NONEXISTENT_KEY_XYZ".to_string());

        let result = config.get_api_key();
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_none_for_local_models() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("none".to_string());
        let key = config.get_api_key().unwrap();
        assert_eq!(key, "");
    }

    #[test]
    fn test_api_key_openai_compatible_missing_ok() {
        let mut config = Config::default();
        config.llm.provider = "openai-compatible".to_string();
        config.llm.api_key_env = Some("GITWRAP_NONEXISTENT_KEY_OAI_999".to_string());
        let key = config.get_api_key().unwrap();
        assert_eq!(key, "");
    }

    #[test]
    fn test_max_tokens_provider_defaults() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.get_max_tokens(), 4096);

        llm.provider = "openai".to_string();
        assert_eq!(llm.get_max_tokens(), 4096);

        llm.provider = "openai-compatible".to_string();
        assert_eq!(llm.get_max_tokens(), 16384);

        // Explicit override wins
        llm.max_tokens = Some(2000);
        assert_eq!(llm.get_max_tokens(), 2000);
    }

    #[test]
    #[serial]
    fn test_github_token_absent() {
        env::remove_var("GITWRAP_TEST_GH_TOKEN");
        let mut config = Config::default();
        config.github.token_env = "GITWRAP_TEST_GH_TOKEN".to_string();
        assert!(config.github_token().is_none());
    }

    #[test]
    #[serial]
    fn test_github_token_present() {
        env::set_var("GITWRAP_TEST_GH_TOKEN_2", "ghp_abc");
        let mut config = Config::default();
        config.github.token_env = "GITWRAP_TEST_GH_TOKEN_2".to_string();
        assert_eq!(config.github_token().unwrap(), "ghp_abc");
        env::remove_var("GITWRAP_TEST_GH_TOKEN_2");
    }

    #[test]
    #[serial]
    fn test_github_token_empty_is_anonymous() {
        env::set_var("GITWRAP_TEST_GH_TOKEN_3", "");
        let mut config = Config::default();
        config.github.token_env = "GITWRAP_TEST_GH_TOKEN_3".to_string();
        assert!(config.github_token().is_none());
        env::remove_var("GITWRAP_TEST_GH_TOKEN_3");
    }
}
