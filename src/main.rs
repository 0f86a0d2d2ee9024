use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;
mod config;
mod github;
mod llm;
mod pipeline;
mod util;

#[derive(Parser)]
#[command(name = "gitwrap", version)]
#[command(about = "Generate a festive HTML showcase of a GitHub user's repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter, and wrap a user's repositories into an HTML page
    Generate {
        /// GitHub username to search
        username: String,

        /// Primary language of repositories (default: from config)
        #[arg(long)]
        language: Option<String>,

        /// Minimum number of stars (inclusive)
        #[arg(long)]
        min_stars: Option<u32>,

        /// Only repositories updated within the last N months (30-day months)
        #[arg(long)]
        updated_within_months: Option<u32>,

        /// HTML template containing the ___GIFTS_DATA___ placeholder
        #[arg(short, long)]
        template: Option<String>,

        /// Directory the rendered page is written to
        #[arg(long, default_value = ".")]
        output_dir: String,

        /// Path to config file (defaults to ~/.config/gitwrap/config.toml or ./gitwrap.toml)
        #[arg(long)]
        config: Option<String>,

        /// Override LLM provider (azure, openai, openai-compatible)
        #[arg(long)]
        provider: Option<String>,

        /// Override LLM model or Azure deployment (e.g., "gpt-4o")
        #[arg(long)]
        model: Option<String>,

        /// Override endpoint base URL (Azure resource or OpenAI-compatible server)
        #[arg(long)]
        base_url: Option<String>,

        /// Use mock LLM client for testing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            username,
            language,
            min_stars,
            updated_within_months,
            template,
            output_dir,
            config,
            provider,
            model,
            base_url,
            dry_run,
        } => {
            cli::generate::run(
                username,
                language,
                min_stars,
                updated_within_months,
                template,
                output_dir,
                config,
                provider,
                model,
                base_url,
                dry_run,
            )
            .await?;
        }
    }

    Ok(())
}
