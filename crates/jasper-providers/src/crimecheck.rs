//! CrimeCheck client: criminal-record lookups. Restricted to legal-tier
//! callers and above.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use jasper_core::provider::FallbackProvider;
use jasper_core::types::{RetrievedDocument, Tier};

pub const PROVIDER_NAME: &str = "crime-check";

pub struct CrimeCheckClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CrimeRecord>,
}

#[derive(Debug, Deserialize)]
struct CrimeRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl CrimeCheckClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build crime-check http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(text));
        debug!("crime-check lookup: {url}");
        let response: SearchResponse = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("crime-check request failed")?
            .error_for_status()
            .context("crime-check returned an error status")?
            .json()
            .await
            .context("crime-check returned invalid JSON")?;
        Ok(map_records(response))
    }
}

fn map_records(response: SearchResponse) -> Vec<RetrievedDocument> {
    response
        .results
        .into_iter()
        .map(|r| RetrievedDocument {
            doc_id: None,
            title: r.title,
            content: None,
            description: r.description,
            summary: r.summary,
            snippet: None,
            source: PROVIDER_NAME.to_string(),
        })
        .collect()
}

#[async_trait]
impl FallbackProvider for CrimeCheckClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn min_tier(&self) -> Tier {
        Tier::Legal
    }

    async fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        self.search(text).await
    }
}
