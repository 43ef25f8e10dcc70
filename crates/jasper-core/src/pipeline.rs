//! End-to-end "answer this query" orchestration:
//! analyze → tier-filtered search → fallback chain → synthesize.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, warn};

use crate::analyzer::analyze;
use crate::provider::FallbackChain;
use crate::store::{DocumentStore, DEFAULT_SEARCH_LIMIT};
use crate::synthesizer::synthesize;
use crate::templates::ERROR_RESPONSE;
use crate::types::{QueryResponse, ResponseMetadata, Tier};

/// Marker used in `sources` for provider results without a document ID.
const EXTERNAL_SOURCE: &str = "external";

pub struct QueryPipeline {
    store: Arc<dyn DocumentStore>,
    fallback: FallbackChain,
    search_limit: usize,
}

impl QueryPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, fallback: FallbackChain) -> Self {
        Self {
            store,
            fallback,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn fallback(&self) -> &FallbackChain {
        &self.fallback
    }

    /// Answer a query for a caller of the given tier.
    ///
    /// Never fails from the caller's perspective: any unexpected error
    /// inside the pipeline degrades to a fixed apologetic response with
    /// `intent = "error"`, zero confidence, and no sources.
    pub async fn answer(&self, query: &str, tier: Tier) -> QueryResponse {
        match self.run(query, tier).await {
            Ok(response) => response,
            Err(e) => {
                error!("query pipeline error: {e}");
                error_response()
            }
        }
    }

    async fn run(&self, query: &str, tier: Tier) -> Result<QueryResponse> {
        let analysis = analyze(query);
        debug!(
            "query analyzed: intent={} confidence={:.2}",
            analysis.intent.as_str(),
            analysis.confidence
        );

        let mut docs = match self
            .store
            .search(query, tier.access_level(), self.search_limit)
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                // A failing store degrades to the fallback chain rather
                // than aborting the query.
                warn!("document search failed: {e}");
                Vec::new()
            }
        };

        if docs.is_empty() {
            docs = self.fallback.fetch(query, tier).await;
        }

        let response = synthesize(query, &analysis, &docs);
        let sources = docs
            .iter()
            .map(|d| {
                d.doc_id
                    .clone()
                    .unwrap_or_else(|| EXTERNAL_SOURCE.to_string())
            })
            .collect();

        Ok(QueryResponse {
            response,
            metadata: ResponseMetadata {
                intent: analysis.intent.as_str().to_string(),
                confidence: analysis.confidence,
                sources,
            },
        })
    }
}

/// The only user-visible error shape for the answer operation.
pub fn error_response() -> QueryResponse {
    QueryResponse {
        response: ERROR_RESPONSE.to_string(),
        metadata: ResponseMetadata {
            intent: "error".to_string(),
            confidence: 0.0,
            sources: Vec::new(),
        },
    }
}
