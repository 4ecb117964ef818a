use crate::error::LinkHarvesterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Format used for the `time` column: UTC, microsecond precision, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A header-delimited span of the source document, trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub number: usize,
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    pub description: &'a str,
    pub url: &'a str,
}

/// One row of the link table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    pub source_url: String,
    pub url: String,
    pub description: String,
    pub time: String,
}

impl LinkRow {
    pub fn new(source_url: &str, link: &Link<'_>, captured_at: DateTime<Utc>) -> Self {
        Self {
            source_url: source_url.to_string(),
            url: link.url.to_string(),
            description: link.description.to_string(),
            time: format_timestamp(captured_at),
        }
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("md-links/{}", crate::VERSION),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Per-request options; `None` falls back to the session's settings.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub timeout: Option<Duration>,
}

/// What the rendering collaborator reports back for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub success: bool,
    pub markdown: Option<String>,
    pub error_message: Option<String>,
    pub status_code: Option<u16>,
}

impl CrawlResult {
    pub fn succeeded(markdown: String, status_code: Option<u16>) -> Self {
        Self {
            success: true,
            markdown: Some(markdown),
            error_message: None,
            status_code,
        }
    }

    pub fn failed(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            success: false,
            markdown: None,
            error_message: Some(message.into()),
            status_code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub chunks: Vec<String>,
    pub rows: Vec<LinkRow>,
}

#[derive(Debug)]
pub enum CrawlOutcome {
    Success(CrawlReport),
    FetchFailed {
        url: String,
        message: String,
    },
    PersistFailed {
        progress: CrawlReport,
        cause: LinkHarvesterError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkPreview {
    pub number: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub links: Vec<LinkPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub description: String,
    pub url: String,
}
