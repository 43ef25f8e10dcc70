//! BlackBox precedents client: case-law lookups by topic.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use jasper_core::provider::FallbackProvider;
use jasper_core::types::RetrievedDocument;

pub const PROVIDER_NAME: &str = "legal-precedents";

pub struct PrecedentsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PrecedentsResponse {
    #[serde(default)]
    precedents: Vec<Precedent>,
}

#[derive(Debug, Deserialize)]
struct Precedent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    citation: Option<String>,
}

impl PrecedentsClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build precedents http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        let url = format!(
            "{}/precedents?q={}",
            self.base_url,
            urlencoding::encode(text)
        );
        debug!("precedents lookup: {url}");
        let response: PrecedentsResponse = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("precedents request failed")?
            .error_for_status()
            .context("precedents returned an error status")?
            .json()
            .await
            .context("precedents returned invalid JSON")?;
        Ok(map_precedents(response))
    }
}

fn map_precedents(response: PrecedentsResponse) -> Vec<RetrievedDocument> {
    response
        .precedents
        .into_iter()
        .map(|p| {
            let title = match &p.citation {
                Some(citation) if !citation.is_empty() => format!("{} ({citation})", p.title),
                _ => p.title,
            };
            RetrievedDocument {
                doc_id: None,
                title,
                content: None,
                description: None,
                summary: p.summary,
                snippet: None,
                source: PROVIDER_NAME.to_string(),
            }
        })
        .collect()
}

#[async_trait]
impl FallbackProvider for PrecedentsClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        self.search(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_precedents_with_citation_in_title() {
        let response: PrecedentsResponse = serde_json::from_str(
            r#"{"precedents": [
                {"title": "D.K. Basu v. State of West Bengal",
                 "summary": "Guidelines for arrest and detention.",
                 "citation": "AIR 1997 SC 610"},
                {"title": "Uncited matter"}
            ]}"#,
        )
        .unwrap();
        let docs = map_precedents(response);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "D.K. Basu v. State of West Bengal (AIR 1997 SC 610)");
        assert_eq!(docs[0].best_text(), "Guidelines for arrest and detention.");
        assert_eq!(docs[1].title, "Uncited matter");
        assert_eq!(docs[1].source, PROVIDER_NAME);
    }

    #[test]
    fn tolerates_missing_precedents_field() {
        let response: PrecedentsResponse = serde_json::from_str("{}").unwrap();
        assert!(map_precedents(response).is_empty());
    }
}
