use crate::error::{LinkHarvesterError, Result};
use crate::types::{CrawlResult, RunConfig, SessionConfig};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

/// Turns a source (URL or local path) into document text.
///
/// Failures are reported inside the returned [`CrawlResult`], never as `Err`.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, source: &str, run: &RunConfig) -> CrawlResult;
}

pub struct ContentFetcher;

impl ContentFetcher {
    /// Acquires a fetch session. It is released when the session is dropped.
    pub fn open(config: &SessionConfig) -> Result<FetchSession> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        debug!("Opened fetch session (timeout {:?})", config.timeout);
        Ok(FetchSession { client })
    }

    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }
}

pub struct FetchSession {
    client: reqwest::Client,
}

impl FetchSession {
    async fn fetch_from_url(&self, url: &str, run: &RunConfig) -> CrawlResult {
        info!("Fetching content from URL: {}", url);

        if let Err(e) = Url::parse(url) {
            return CrawlResult::failed(LinkHarvesterError::from(e).to_string(), None);
        }

        let mut request = self.client.get(url);
        if let Some(timeout) = run.timeout {
            request = request.timeout(timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return CrawlResult::failed(describe_transport_error(&e), None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return CrawlResult::failed(format!("HTTP status {}", status), Some(status.as_u16()));
        }

        match response.text().await {
            Ok(content) => {
                debug!("Fetched {} bytes from {}", content.len(), url);
                CrawlResult::succeeded(content, Some(status.as_u16()))
            }
            Err(e) => CrawlResult::failed(describe_transport_error(&e), Some(status.as_u16())),
        }
    }

    async fn fetch_from_file(&self, file_path: &str) -> CrawlResult {
        info!("Reading file: {}", file_path);

        let path = Path::new(file_path);
        if !path.is_file() {
            return CrawlResult::failed(format!("File not found: {}", file_path), None);
        }

        match fs::read_to_string(path).await {
            Ok(content) => CrawlResult::succeeded(content, None),
            Err(e) => CrawlResult::failed(LinkHarvesterError::from(e).to_string(), None),
        }
    }
}

#[async_trait]
impl DocumentRenderer for FetchSession {
    async fn render(&self, source: &str, run: &RunConfig) -> CrawlResult {
        if ContentFetcher::is_url(source) {
            self.fetch_from_url(source, run).await
        } else {
            self.fetch_from_file(source).await
        }
    }
}

impl Drop for FetchSession {
    fn drop(&mut self) {
        debug!("Closed fetch session");
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timeout".to_string()
    } else {
        format!("HTTP request failed: {}", e)
    }
}
