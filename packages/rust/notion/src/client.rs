//! Reqwest implementation of [`ContentStore`] against the Notion API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use inkling_shared::config::NotionConfig;
use inkling_shared::{Block, InklingError, PageRef, Result};

use crate::{CHILD_PAGE_SIZE, ContentStore, parse};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Inkling/", env!("CARGO_PKG_VERSION"));

/// Request timeout. Upstream calls are best-effort; a hung call stalls only
/// the question awaiting it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Notion API client with bearer auth and versioned requests.
pub struct NotionClient {
    http: Client,
    api_base: Url,
    token: String,
    api_version: String,
}

impl NotionClient {
    /// Create a client, reading the integration token from the env var named
    /// in the config.
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let token = std::env::var(&config.api_key_env).map_err(|_| {
            InklingError::config(format!(
                "Notion integration token not found. Set the {} environment variable.",
                config.api_key_env
            ))
        })?;
        Self::with_token(config, token)
    }

    /// Create a client with an explicit token (used by tests against a mock
    /// server).
    pub fn with_token(config: &NotionConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InklingError::Network(format!("failed to build HTTP client: {e}")))?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| InklingError::config(format!("invalid Notion api_base: {e}")))?;

        Ok(Self {
            http,
            api_base,
            token: token.into(),
            api_version: config.api_version.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path)
            .map_err(|e| InklingError::config(format!("invalid endpoint {path}: {e}")))
    }

    /// Check status and decode the JSON body.
    async fn decode(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InklingError::api(status.as_u16(), snippet(&body)));
        }

        response
            .json()
            .await
            .map_err(|e| InklingError::parse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl ContentStore for NotionClient {
    #[instrument(skip(self))]
    async fn search_pages(&self) -> Result<Vec<PageRef>> {
        let url = self.endpoint("v1/search")?;
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": {"property": "object", "value": "page"},
                "sort": {"timestamp": "last_edited_time", "direction": "descending"},
            });
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }

            let response = self
                .http
                .post(url.clone())
                .bearer_auth(&self.token)
                .header("Notion-Version", &self.api_version)
                .json(&body)
                .send()
                .await
                .map_err(|e| InklingError::Network(format!("search: {e}")))?;

            let value = self.decode(response).await?;
            let (batch, next) = parse::parse_search_page(&value)?;
            pages.extend(batch);

            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        debug!(page_count = pages.len(), "page search complete");
        Ok(pages)
    }

    #[instrument(skip(self))]
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<(Vec<Block>, Option<String>)> {
        let mut url = self.endpoint(&format!("v1/blocks/{block_id}/children"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page_size", &CHILD_PAGE_SIZE.to_string());
            if let Some(c) = cursor {
                query.append_pair("start_cursor", c);
            }
        }

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api_version)
            .send()
            .await
            .map_err(|e| InklingError::Network(format!("children of {block_id}: {e}")))?;

        let value = self.decode(response).await?;
        parse::parse_children_page(&value)
    }
}

/// Trim an error body to a short human-readable cause string.
fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let cut = trimmed
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        format!("{}…", &trimmed[..cut])
    }
}
