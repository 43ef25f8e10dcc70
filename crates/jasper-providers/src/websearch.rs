//! Google Custom Search client, last resort in the fallback chain.
//! Queries are suffixed with "legal india" to keep results on topic.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use jasper_core::provider::FallbackProvider;
use jasper_core::types::RetrievedDocument;

pub const PROVIDER_NAME: &str = "web-search";

const QUERY_SUFFIX: &str = "legal india";
const RESULT_COUNT: u8 = 10;

pub struct WebSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    search_engine_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl WebSearchClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        search_engine_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build web-search http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            search_engine_id: search_engine_id.to_string(),
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        let q = format!("{text} {QUERY_SUFFIX}");
        let num = RESULT_COUNT.to_string();
        debug!("web search: {q}");
        let response: SearchResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", q.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("web-search request failed")?
            .error_for_status()
            .context("web-search returned an error status")?
            .json()
            .await
            .context("web-search returned invalid JSON")?;
        Ok(map_items(response))
    }
}

fn map_items(response: SearchResponse) -> Vec<RetrievedDocument> {
    response
        .items
        .into_iter()
        .map(|item| {
            let title = match &item.link {
                Some(link) if !link.is_empty() => format!("{} ({link})", item.title),
                _ => item.title,
            };
            RetrievedDocument {
                doc_id: None,
                title,
                content: None,
                description: None,
                summary: None,
                snippet: item.snippet,
                source: PROVIDER_NAME.to_string(),
            }
        })
        .collect()
}

#[async_trait]
impl FallbackProvider for WebSearchClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        self.search(text).await
    }
}
