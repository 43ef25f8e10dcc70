//! External fallback providers: consulted only when the internal
//! document search comes back empty.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::types::{RetrievedDocument, Tier};

/// One external information source. Implementations live in
/// `jasper-providers`; the pipeline only sees this trait.
#[async_trait]
pub trait FallbackProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Lowest tier allowed to consult this provider. Providers with
    /// sensitive data (e.g. crime records) restrict themselves here.
    fn min_tier(&self) -> Tier {
        Tier::Public
    }

    async fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>>;
}

/// Ordered chain of providers with first-non-empty-wins semantics.
///
/// A provider error is logged and treated as an empty result; the chain
/// only stops early on a non-empty success. Disabled providers are never
/// added to the chain in the first place.
#[derive(Default)]
pub struct FallbackChain {
    providers: Vec<Arc<dyn FallbackProvider>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Arc<dyn FallbackProvider>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Look up a provider by name (used by the direct fallback routes).
    pub fn get(&self, name: &str) -> Option<Arc<dyn FallbackProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Walk the chain in order, skipping providers the caller's tier may
    /// not consult, returning the first non-empty result. Exhausting the
    /// chain yields an empty vec, never an error.
    pub async fn fetch(&self, query: &str, tier: Tier) -> Vec<RetrievedDocument> {
        for provider in &self.providers {
            if tier.access_level() < provider.min_tier().access_level() {
                debug!(
                    "skipping provider {} (requires {} tier)",
                    provider.name(),
                    provider.min_tier().as_str()
                );
                continue;
            }
            match provider.query(query).await {
                Ok(docs) if !docs.is_empty() => {
                    debug!("provider {} returned {} results", provider.name(), docs.len());
                    return docs;
                }
                Ok(_) => {}
                Err(e) => warn!("provider {} failed: {e}", provider.name()),
            }
        }
        Vec::new()
    }
}
