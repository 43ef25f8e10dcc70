//! BlackBox legal-data client: statutes, schemes, and procedural
//! reference material. Shares endpoint configuration with the
//! precedents client; only the path differs.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use jasper_core::provider::FallbackProvider;
use jasper_core::types::RetrievedDocument;

pub const PROVIDER_NAME: &str = "legal-data";

pub struct LegalDataClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LegalDataResponse {
    #[serde(default)]
    results: Vec<LegalDataEntry>,
}

#[derive(Debug, Deserialize)]
struct LegalDataEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl LegalDataClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build legal-data http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        let url = format!(
            "{}/legal-data?q={}",
            self.base_url,
            urlencoding::encode(text)
        );
        debug!("legal-data lookup: {url}");
        let response: LegalDataResponse = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("legal-data request failed")?
            .error_for_status()
            .context("legal-data returned an error status")?
            .json()
            .await
            .context("legal-data returned invalid JSON")?;
        Ok(map_entries(response))
    }
}

fn map_entries(response: LegalDataResponse) -> Vec<RetrievedDocument> {
    response
        .results
        .into_iter()
        .map(|e| RetrievedDocument {
            doc_id: None,
            title: e.title,
            content: e.content,
            description: e.description,
            summary: None,
            snippet: None,
            source: PROVIDER_NAME.to_string(),
        })
        .collect()
}

#[async_trait]
impl FallbackProvider for LegalDataClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        self.search(text).await
    }
}
