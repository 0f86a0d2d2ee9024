use anyhow::{bail, Result};

use super::client::{LlmClient, MockLlmClient};
use super::client_impl::{AzureOpenAIClient, OpenAIClient};
use crate::config::Config;

/// Create an LLM client based on configuration
pub fn create_client(config: &Config, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let api_key = config.get_api_key()?;
    let max_tokens = config.llm.get_max_tokens();

    match config.llm.provider.as_str() {
        "azure" => {
            let endpoint = match config.llm.base_url.clone() {
                Some(url) => url,
                None => bail!("azure provider requires llm.base_url (the resource endpoint)"),
            };
            Ok(Box::new(AzureOpenAIClient::new(
                api_key,
                endpoint,
                config.llm.model.clone(),
                config.llm.api_version.clone(),
                max_tokens,
            )?))
        }

        "openai" => Ok(Box::new(OpenAIClient::new(
            api_key,
            config.llm.model.clone(),
            max_tokens,
        )?)),

        "openai-compatible" => {
            let base_url = config
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1".to_string());

            Ok(Box::new(OpenAIClient::with_base_url(
                api_key,
                config.llm.model.clone(),
                base_url,
                max_tokens,
            )?))
        }

        unknown => bail!("Unknown LLM provider: {}", unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_create_mock_client_for_dry_run() {
        let config = Config::default();
        // Succeeding without panic proves mock client was created
        create_client(&config, true).unwrap();
    }

    #[test]
    #[serial]
    fn test_create_azure_client() {
        env::set_var("AZURE_OPENAI_API_KEY", "test_key");
        let mut config = Config::default(); // Defaults to azure
        config.llm.base_url = Some("https://myresource.openai.azure.com".to_string());
        let result = create_client(&config, false);
        assert!(result.is_ok());
        env::remove_var("AZURE_OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_create_azure_client_requires_endpoint() {
        env::set_var("AZURE_OPENAI_API_KEY", "test_key");
        let config = Config::default(); // base_url unset
        let result = create_client(&config, false);
        assert!(result.is_err());
        env::remove_var("AZURE_OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_create_openai_client() {
        env::set_var("GITWRAP_TEST_OAI_KEY", "test_key");
        let mut config = Config::default();
        config.llm.provider = "openai".to_string();
        config.llm.api_key_env = Some("GITWRAP_TEST_OAI_KEY".to_string());
        let result = create_client(&config, false);
        assert!(result.is_ok());
        env::remove_var("GITWRAP_TEST_OAI_KEY");
    }

    #[test]
    fn test_create_openai_compatible_client() {
        let mut config = Config::default();
        config.llm.provider = "openai-compatible".to_string();
        config.llm.api_key_env = Some("none".to_string());
        config.llm.base_url = Some("http://localhost:11434/v1".to_string());
        let result = create_client(&config, false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_client_with_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "unknown_provider".to_string();
        config.llm.api_key_env = Some("none".to_string());
        let result = create_client(&config, false);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown LLM provider"));
        }
    }

    #[test]
    fn test_create_client_without_api_key() {
        // Use a unique nonexistent env var to avoid race conditions with parallel tests
        let mut config = Config::default();
        config.llm.api_key_env = Some("GITWRAP_TEST_NONEXISTENT_KEY_99999".to_string());
        let result = create_client(&config, false);
        assert!(
            result.is_err(),
            "Expected error when API key is missing, but got Ok(client)"
        );
        if let Err(e) = result {
            assert!(e.to_string().contains("API key not found"));
        }
    }
}
