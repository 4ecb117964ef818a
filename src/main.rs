mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs, PreviewArgs};
use markdown_link_harvester::config::{self, BackendConfig};
use markdown_link_harvester::{
    ContentFetcher, CrawlOutcome, Crawler, LinkStore, MemoryStore, Result, RunConfig,
    SessionConfig, SupabaseStore,
};
use std::time::Duration;
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for crawl progress
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config::load_env(cli.env_file.as_deref()).context("Failed to load environment file")?;

    let result = match &cli.command {
        Commands::Crawl(args) => handle_crawl_command(args).await,
        Commands::Preview(args) => handle_preview_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn session_config(user_agent: Option<&str>) -> SessionConfig {
    let mut config = SessionConfig::default();
    if let Some(user_agent) = user_agent {
        config.user_agent = user_agent.to_string();
    }
    config
}

fn run_config(timeout: u64) -> RunConfig {
    RunConfig {
        timeout: Some(Duration::from_secs(timeout)),
    }
}

async fn handle_crawl_command(args: &CrawlArgs) -> Result<()> {
    info!("Starting crawl of {}", args.source);

    let memory_store = MemoryStore::new();
    let supabase_store;
    let store: &dyn LinkStore = if args.dry_run {
        info!("Dry run: rows are kept in memory");
        &memory_store
    } else {
        supabase_store = SupabaseStore::new(BackendConfig::from_env(), args.table.as_str());
        info!("Saving links to table '{}'", supabase_store.table());
        &supabase_store
    };

    let outcome = {
        let session = ContentFetcher::open(&session_config(args.user_agent.as_deref()))?;
        let crawler = Crawler::new(&session, store)?.with_run_config(run_config(args.timeout));
        let mut stdout = std::io::stdout();
        let outcome = crawler.run(&args.source, &mut stdout).await?;
        outcome
    };

    match outcome {
        CrawlOutcome::Success(report) => {
            info!(
                "Crawl completed: {} chunks, {} links saved",
                report.chunks.len(),
                report.rows.len()
            );
            if args.dry_run {
                println!("{}", serde_json::to_string_pretty(&memory_store.rows())?);
            }
            Ok(())
        }
        CrawlOutcome::FetchFailed { url, message } => {
            warn!("Nothing saved, {} could not be fetched: {}", url, message);
            Ok(())
        }
        CrawlOutcome::PersistFailed { progress, cause } => {
            error!(
                "Stopped after saving {} links from {} chunks",
                progress.rows.len(),
                progress.chunks.len()
            );
            Err(cause)
        }
    }
}

async fn handle_preview_command(args: &PreviewArgs) -> Result<()> {
    info!("Previewing {}", args.source);

    let store = MemoryStore::new();
    let previews = {
        let session = ContentFetcher::open(&session_config(None))?;
        let crawler = Crawler::new(&session, &store)?.with_run_config(run_config(args.timeout));
        let previews = crawler.preview(&args.source).await?;
        previews
    };

    println!("\n=== Preview for '{}' ===", args.source);
    println!("Chunks: {}", previews.len());
    println!(
        "Links: {}",
        previews.iter().map(|p| p.links.len()).sum::<usize>()
    );
    for preview in &previews {
        let title = preview.text.lines().next().unwrap_or_default();
        println!(
            "  Chunk {}: bytes {}-{} ({} links) {}",
            preview.number,
            preview.start,
            preview.end,
            preview.links.len(),
            title
        );
    }

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&previews)
            .context("Failed to serialize preview")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON preview file")?;

        info!("Preview written to: {}", json_path.display());
    }

    Ok(())
}
