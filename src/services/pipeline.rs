use crate::error::{LinkHarvesterError, Result};
use crate::services::chunker::Chunker;
use crate::services::extractor::LinkExtractor;
use crate::services::fetcher::DocumentRenderer;
use crate::services::persister::{LinkStore, Persister};
use crate::types::{ChunkPreview, CrawlOutcome, CrawlReport, LinkPreview, RunConfig};
use std::io::Write;
use tracing::{error, info, warn};

/// Fetches one document, chunks it, and persists every link it contains.
pub struct Crawler<'a> {
    renderer: &'a dyn DocumentRenderer,
    store: &'a dyn LinkStore,
    run_config: RunConfig,
    chunker: Chunker,
    extractor: LinkExtractor,
}

impl<'a> Crawler<'a> {
    pub fn new(renderer: &'a dyn DocumentRenderer, store: &'a dyn LinkStore) -> Result<Self> {
        Ok(Self {
            renderer,
            store,
            run_config: RunConfig::default(),
            chunker: Chunker::new()?,
            extractor: LinkExtractor::new()?,
        })
    }

    pub fn with_run_config(mut self, run_config: RunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    /// Runs the whole pipeline for `url`, echoing progress to `out`.
    ///
    /// Only failures writing to `out` are returned as `Err`; fetch and insert
    /// failures come back as the matching [`CrawlOutcome`] variant.
    pub async fn run<W: Write>(&self, url: &str, out: &mut W) -> Result<CrawlOutcome> {
        let markdown = match self.fetch(url).await {
            Ok(markdown) => markdown,
            Err(message) => {
                writeln!(out, "Failed to crawl {}: {}", url, message)?;
                return Ok(CrawlOutcome::FetchFailed {
                    url: url.to_string(),
                    message,
                });
            }
        };

        let persister = Persister::new(self.store, url);
        let mut progress = CrawlReport::default();

        for chunk in self.chunker.chunks(&markdown) {
            writeln!(out, "\n--- Chunk {} ---\n{}\n", chunk.number, chunk.text)?;
            progress.chunks.push(chunk.text.to_string());

            for link in self.extractor.links(chunk.text) {
                writeln!(
                    out,
                    "Saving: description={}, url={}",
                    link.description, link.url
                )?;
                match persister.save(&link).await {
                    Ok(row) => progress.rows.push(row),
                    Err(cause) => {
                        error!(
                            "Insert failed after {} saved links (chunk {}): {}",
                            progress.rows.len(),
                            chunk.number,
                            cause
                        );
                        return Ok(CrawlOutcome::PersistFailed { progress, cause });
                    }
                }
            }
        }

        writeln!(
            out,
            "Saved {} links from {} chunks",
            progress.rows.len(),
            progress.chunks.len()
        )?;
        info!(
            "Crawl of {} complete: {} chunks, {} links",
            url,
            progress.chunks.len(),
            progress.rows.len()
        );

        Ok(CrawlOutcome::Success(progress))
    }

    /// Chunks and links for `url` without touching the store.
    pub async fn preview(&self, url: &str) -> Result<Vec<ChunkPreview>> {
        let markdown = self
            .fetch(url)
            .await
            .map_err(|message| LinkHarvesterError::FetchFailed {
                url: url.to_string(),
                message,
            })?;

        let previews = self
            .chunker
            .chunks(&markdown)
            .map(|chunk| ChunkPreview {
                number: chunk.number,
                start: chunk.start,
                end: chunk.end,
                text: chunk.text.to_string(),
                links: self
                    .extractor
                    .links(chunk.text)
                    .map(|link| LinkPreview {
                        description: link.description.to_string(),
                        url: link.url.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Ok(previews)
    }

    async fn fetch(&self, url: &str) -> std::result::Result<String, String> {
        let result = self.renderer.render(url, &self.run_config).await;
        match result.markdown {
            Some(markdown) if result.success => Ok(markdown),
            _ => {
                let message = result
                    .error_message
                    .unwrap_or_else(|| "no content returned".to_string());
                warn!("Failed to crawl {}: {}", url, message);
                Err(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::persister::MemoryStore;
    use crate::types::{CrawlResult, LinkRow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticRenderer(CrawlResult);

    #[async_trait]
    impl DocumentRenderer for StaticRenderer {
        async fn render(&self, _source: &str, _run: &RunConfig) -> CrawlResult {
            self.0.clone()
        }
    }

    /// Accepts `limit` rows, then rejects every insert.
    struct FlakyStore {
        limit: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LinkStore for FlakyStore {
        async fn insert(&self, _row: &LinkRow) -> Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.limit {
                return Err(LinkHarvesterError::InsertRejected {
                    table: "links".to_string(),
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    const DOC: &str = "# A\nhello [L1](u1)\n## B\nworld [L2](u2)";
    const SOURCE: &str = "https://docs.example/llms.txt";

    #[tokio::test]
    async fn test_end_to_end_two_chunks_two_rows() {
        let renderer = StaticRenderer(CrawlResult::succeeded(DOC.to_string(), Some(200)));
        let store = MemoryStore::new();
        let crawler = Crawler::new(&renderer, &store).unwrap();
        let mut out = Vec::new();

        let outcome = crawler.run(SOURCE, &mut out).await.unwrap();

        let report = match outcome {
            CrawlOutcome::Success(report) => report,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(
            report.chunks,
            vec!["# A\nhello [L1](u1)", "## B\nworld [L2](u2)"]
        );

        let rows = store.rows();
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.description.as_str(), r.url.as_str()))
            .collect();
        assert_eq!(pairs, vec![("L1", "u1"), ("L2", "u2")]);
        assert!(rows.iter().all(|r| r.source_url == SOURCE));
        assert_eq!(report.rows, rows);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("--- Chunk 1 ---\n# A\nhello [L1](u1)\n"));
        assert!(printed.contains("--- Chunk 2 ---\n## B\nworld [L2](u2)\n"));
        assert!(printed.contains("Saving: description=L1, url=u1"));
        assert!(printed.contains("Saving: description=L2, url=u2"));
        assert!(printed.ends_with("Saved 2 links from 2 chunks\n"));
    }

    #[tokio::test]
    async fn test_fetch_failure_prints_one_line_and_inserts_nothing() {
        let renderer = StaticRenderer(CrawlResult::failed("timeout", None));
        let store = MemoryStore::new();
        let crawler = Crawler::new(&renderer, &store).unwrap();
        let mut out = Vec::new();

        let outcome = crawler.run(SOURCE, &mut out).await.unwrap();

        match outcome {
            CrawlOutcome::FetchFailed { url, message } => {
                assert_eq!(url, SOURCE);
                assert_eq!(message, "timeout");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.rows().is_empty());

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.contains(SOURCE));
        assert!(printed.contains("timeout"));
    }

    #[tokio::test]
    async fn test_insert_failure_keeps_partial_progress() {
        let doc = "# A\n[one](1) [two](2)\n## B\n[three](3)";
        let renderer = StaticRenderer(CrawlResult::succeeded(doc.to_string(), None));
        let store = FlakyStore {
            limit: 1,
            calls: AtomicUsize::new(0),
        };
        let crawler = Crawler::new(&renderer, &store).unwrap();
        let mut out = Vec::new();

        let outcome = crawler.run(SOURCE, &mut out).await.unwrap();

        match outcome {
            CrawlOutcome::PersistFailed { progress, cause } => {
                assert_eq!(progress.chunks, vec!["# A\n[one](1) [two](2)"]);
                assert_eq!(progress.rows.len(), 1);
                assert_eq!(progress.rows[0].description, "one");
                assert!(matches!(
                    cause,
                    LinkHarvesterError::InsertRejected { status: 503, .. }
                ));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // The second chunk is never reached.
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        let printed = String::from_utf8(out).unwrap();
        assert!(!printed.contains("Chunk 2"));
    }

    #[tokio::test]
    async fn test_document_without_links_saves_nothing() {
        let renderer = StaticRenderer(CrawlResult::succeeded("# Only text\nno links".into(), None));
        let store = MemoryStore::new();
        let crawler = Crawler::new(&renderer, &store).unwrap();
        let mut out = Vec::new();

        let outcome = crawler.run(SOURCE, &mut out).await.unwrap();

        assert!(matches!(outcome, CrawlOutcome::Success(ref r) if r.rows.is_empty()));
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_preview_collects_links_per_chunk() {
        let renderer = StaticRenderer(CrawlResult::succeeded(DOC.to_string(), None));
        let store = MemoryStore::new();
        let crawler = Crawler::new(&renderer, &store).unwrap();

        let previews = crawler.preview(SOURCE).await.unwrap();

        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].links[0].description, "L1");
        assert_eq!(previews[1].links[0].url, "u2");
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_preview_fetch_failure_is_an_error() {
        let renderer = StaticRenderer(CrawlResult::failed("HTTP status 404 Not Found", Some(404)));
        let store = MemoryStore::new();
        let crawler = Crawler::new(&renderer, &store).unwrap();

        let err = crawler.preview(SOURCE).await.unwrap_err();
        assert!(matches!(err, LinkHarvesterError::FetchFailed { .. }));
        assert!(err.to_string().contains("404"));
    }
}
