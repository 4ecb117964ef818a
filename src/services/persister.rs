use crate::config::{BackendConfig, SUPABASE_KEY_VAR, SUPABASE_URL_VAR};
use crate::error::{LinkHarvesterError, Result};
use crate::types::{Link, LinkRow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Mutex;
use tracing::debug;
use url::Url;

pub const DEFAULT_TABLE: &str = "pydantic_docs_llms";

/// A remote table that accepts one row per call.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn insert(&self, row: &LinkRow) -> Result<()>;
}

/// Builds rows for one crawled document and submits them one at a time.
pub struct Persister<'a> {
    store: &'a dyn LinkStore,
    source_url: &'a str,
}

impl<'a> Persister<'a> {
    pub fn new(store: &'a dyn LinkStore, source_url: &'a str) -> Self {
        Self { store, source_url }
    }

    pub async fn save(&self, link: &Link<'_>) -> Result<LinkRow> {
        let row = LinkRow::new(self.source_url, link, Utc::now());
        self.store.insert(&row).await?;
        debug!("Inserted link {} -> {}", row.description, row.url);
        Ok(row)
    }
}

/// Inserts rows through the Supabase (PostgREST) REST interface.
pub struct SupabaseStore {
    client: reqwest::Client,
    config: BackendConfig,
    table: String,
}

impl SupabaseStore {
    pub fn new(config: BackendConfig, table: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn endpoint(&self) -> Result<Url> {
        let base = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| LinkHarvesterError::MissingConfig {
                name: SUPABASE_URL_VAR.to_string(),
            })?;
        let endpoint = Url::parse(&format!(
            "{}/rest/v1/{}",
            base.trim_end_matches('/'),
            self.table
        ))?;
        Ok(endpoint)
    }

    fn credentials(&self) -> Result<(HeaderValue, HeaderValue)> {
        let key = self
            .config
            .key
            .as_deref()
            .ok_or_else(|| LinkHarvesterError::MissingConfig {
                name: SUPABASE_KEY_VAR.to_string(),
            })?;
        let invalid = |_| LinkHarvesterError::InvalidConfig {
            reason: format!("{} is not a valid header value", SUPABASE_KEY_VAR),
        };
        let api_key = HeaderValue::from_str(key).map_err(invalid)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?;
        Ok((api_key, bearer))
    }
}

#[async_trait]
impl LinkStore for SupabaseStore {
    async fn insert(&self, row: &LinkRow) -> Result<()> {
        let endpoint = self.endpoint()?;
        let (api_key, bearer) = self.credentials()?;

        let response = self
            .client
            .post(endpoint)
            .header("apikey", api_key)
            .header(AUTHORIZATION, bearer)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LinkHarvesterError::InsertRejected {
                table: self.table.clone(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Keeps rows in memory instead of sending them anywhere.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<LinkRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<LinkRow> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert(&self, row: &LinkRow) -> Result<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        rows.push(row.clone());
        debug!("Stored row {} in memory", rows.len());
        Ok(())
    }
}
