use clap::{Args, Parser, Subcommand};
use markdown_link_harvester::{DEFAULT_SOURCE, DEFAULT_TABLE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "md-links")]
#[command(about = "Crawl a markdown document, split it at headers, and save every link it contains")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dotenv file holding SUPABASE_URL and SUPABASE_KEY (defaults to ./.env)
    #[arg(long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, chunk, and persist extracted links
    Crawl(CrawlArgs),

    /// Show chunks and links without saving anything
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct CrawlArgs {
    /// Document to crawl (URL or file path)
    #[arg(value_name = "SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Table receiving one row per link
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Keep rows in memory and print them instead of inserting
    #[arg(long)]
    pub dry_run: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// User agent sent with fetch requests
    #[arg(long)]
    pub user_agent: Option<String>,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Document to inspect (URL or file path)
    #[arg(value_name = "SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Write the preview to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}
