pub mod chunker;
pub mod extractor;
pub mod fetcher;
pub mod persister;
pub mod pipeline;

pub use chunker::{Chunker, Chunks};
pub use extractor::LinkExtractor;
pub use fetcher::{ContentFetcher, DocumentRenderer, FetchSession};
pub use persister::{LinkStore, MemoryStore, Persister, SupabaseStore, DEFAULT_TABLE};
pub use pipeline::Crawler;
