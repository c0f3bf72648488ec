mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use pkgcrawl::config::Config;
use pkgcrawl::forge::GitHubForge;
use pkgcrawl::inspect::GoInspector;
use pkgcrawl::repository::{BarProgress, CrawlOutcome, Crawler, GitBackend, NoopProgress, ProgressReporter};
use pkgcrawl::util::summarize;

fn init_logging(verbose: bool) {
    let default = if verbose { "pkgcrawl=debug" } else { "pkgcrawl=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(root) = cli.cache_root {
        config.cache_root = root;
    }
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        config.forge.token = Some(token);
    }

    fs::create_dir_all(&config.cache_root)
        .with_context(|| format!("Could not create cache directory {}", config.cache_root.display()))?;
    info!("Using cache: {}", config.cache_root.display());

    let forge = GitHubForge::new(&config.forge).context("Failed to build forge client")?;
    let progress: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(NoopProgress)
    } else {
        Box::new(BarProgress)
    };
    let crawler = Crawler::new(config, GitBackend, forge, GoInspector::new()).with_progress(progress);

    let outcome = crawler
        .crawl(&cli.repo_url)
        .await
        .with_context(|| format!("Failed to crawl {}", cli.repo_url))?;

    match outcome {
        CrawlOutcome::Skipped(handle) => {
            eprintln!("{} is on the skip list, nothing to do", handle);
        }
        CrawlOutcome::Indexed(record) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            println!("{}", json);
            eprintln!("{}", summarize(&record));
        }
    }

    Ok(())
}
