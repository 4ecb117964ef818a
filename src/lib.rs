//! # Markdown Link Harvester
//!
//! Fetches a Markdown document, splits it into chunks at `#` and `##` header
//! lines, extracts inline `[description](url)` links from every chunk, and
//! inserts one row per link into a remote table.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use markdown_link_harvester::{
//!     BackendConfig, ContentFetcher, CrawlOutcome, Crawler, SessionConfig, SupabaseStore,
//!     DEFAULT_TABLE,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Backend handle built once and passed in
//!     let store = SupabaseStore::new(BackendConfig::from_env(), DEFAULT_TABLE);
//!
//!     // The fetch session is released at the end of this block
//!     let outcome = {
//!         let session = ContentFetcher::open(&SessionConfig::default())?;
//!         let crawler = Crawler::new(&session, &store)?;
//!         let mut stdout = std::io::stdout();
//!         let outcome = crawler
//!             .run("https://docs.pydantic.dev/latest/llms.txt", &mut stdout)
//!             .await?;
//!         outcome
//!     };
//!
//!     if let CrawlOutcome::Success(report) = outcome {
//!         println!("Saved {} links", report.rows.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use config::BackendConfig;
pub use error::{LinkHarvesterError, Result};
pub use services::{
    Chunker, ContentFetcher, Crawler, DocumentRenderer, FetchSession, LinkExtractor, LinkStore,
    MemoryStore, Persister, SupabaseStore, DEFAULT_TABLE,
};
pub use types::{
    Chunk, ChunkPreview, CrawlOutcome, CrawlReport, CrawlResult, Link, LinkPreview, LinkRow,
    RunConfig, SessionConfig,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Document crawled when no source is given on the command line.
pub const DEFAULT_SOURCE: &str = "https://docs.pydantic.dev/latest/llms.txt";
