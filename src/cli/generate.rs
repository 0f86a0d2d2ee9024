use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::github::{GithubClient, SearchParameters};
use crate::llm::factory;
use crate::pipeline::collector::Collector;
use crate::pipeline::generator::GiftGenerator;
use crate::pipeline::renderer;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    username: String,
    language: Option<String>,
    min_stars: Option<u32>,
    updated_within_months: Option<u32>,
    template_override: Option<String>,
    output_dir: String,
    config_path: Option<String>,
    provider_override: Option<String>,
    model_override: Option<String>,
    base_url_override: Option<String>,
    dry_run: bool,
) -> Result<()> {
    // Load config (explicit path, working directory, or user config dir)
    let mut config = Config::load_with_path(config_path)?;

    // Apply CLI overrides
    if let Some(ref provider) = provider_override {
        info!("CLI override: provider = {}", provider);
        config.llm.provider = provider.clone();
    }
    if let Some(ref model) = model_override {
        info!("CLI override: model = {}", model);
        config.llm.model = model.clone();
    }
    if let Some(ref base_url) = base_url_override {
        info!("CLI override: base_url = {}", base_url);
        config.llm.base_url = Some(base_url.clone());
    }
    if let Some(ref template) = template_override {
        info!("CLI override: template = {}", template);
        config.output.template = template.clone();
    }

    let params = SearchParameters {
        username,
        language: language.unwrap_or_else(|| config.search.language.clone()),
        min_stars: min_stars.unwrap_or(config.search.min_stars),
        updated_within_months: updated_within_months
            .unwrap_or(config.search.updated_within_months),
    };
    info!(
        "Searching '{}' for {} repos with >= {} stars updated within {} months",
        params.username, params.language, params.min_stars, params.updated_within_months
    );

    // Stage 1: client initializer. The credential is read from the
    // environment here, once, and passed in explicitly.
    let github = GithubClient::new(config.github.api_url.clone(), config.github_token())?;

    // Stage 2: repository filter
    let collector = Collector::new(&github);
    let matches = collector.collect(&params).await?;

    // Stage 3: copy generator
    let client = factory::create_client(&config, dry_run)?;
    if dry_run {
        info!("Using mock LLM client");
    } else {
        info!("Using {} LLM provider", config.llm.provider);
    }
    let generator = GiftGenerator::new(client);
    let gifts = generator.generate(&params.username, &matches).await?;

    // Stage 4: page renderer. A failed write is logged inside write_page and
    // swallowed; the run still completes.
    let template = renderer::load_template(Path::new(&config.output.template))?;
    let html = renderer::render(&template, &gifts)?;
    renderer::write_page(Path::new(&output_dir), &config.output.prefix, &html);

    Ok(())
}
