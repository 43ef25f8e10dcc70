use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use jasper_core::pipeline::{error_response, QueryPipeline};
use jasper_core::provider::{FallbackChain, FallbackProvider};
use jasper_core::store::DocumentStore;
use jasper_core::templates::{FOLLOW_UP_PROMPT, NO_SOURCES_RESPONSE};
use jasper_core::types::{RetrievedDocument, Tier};

// ── fakes ────────────────────────────────────────────────────────────────

struct FakeStore {
    docs: Vec<RetrievedDocument>,
    fail: bool,
}

impl FakeStore {
    fn with_docs(docs: Vec<RetrievedDocument>) -> Arc<Self> {
        Arc::new(Self { docs, fail: false })
    }

    fn empty() -> Arc<Self> {
        Self::with_docs(Vec::new())
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            docs: Vec::new(),
            fail: true,
        })
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn search(
        &self,
        _query: &str,
        _max_access_level: u8,
        _limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if self.fail {
            bail!("database is locked");
        }
        Ok(self.docs.clone())
    }
}

struct CountingProvider {
    name: &'static str,
    min_tier: Tier,
    results: Vec<RetrievedDocument>,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new(name: &'static str, results: Vec<RetrievedDocument>) -> Arc<Self> {
        Self::restricted(name, Tier::Public, results)
    }

    fn restricted(name: &'static str, min_tier: Tier, results: Vec<RetrievedDocument>) -> Arc<Self> {
        Arc::new(Self {
            name,
            min_tier,
            results,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FallbackProvider for CountingProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn min_tier(&self) -> Tier {
        self.min_tier
    }

    async fn query(&self, _text: &str) -> Result<Vec<RetrievedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

fn internal_doc(doc_id: &str, title: &str, content: &str) -> RetrievedDocument {
    RetrievedDocument {
        doc_id: Some(doc_id.into()),
        title: title.into(),
        content: Some(content.into()),
        source: "store".into(),
        ..Default::default()
    }
}

fn external_doc(title: &str, source: &str) -> RetrievedDocument {
    RetrievedDocument {
        title: title.into(),
        description: Some("Provider-supplied description long enough to summarize.".into()),
        source: source.into(),
        ..Default::default()
    }
}

// ── scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_hit_short_circuits_fallback() {
    let store = FakeStore::with_docs(vec![internal_doc(
        "ACT-1A2B-X",
        "Arrest procedure",
        "An arrested person must be produced before a magistrate within twenty four hours.",
    )]);
    let provider = CountingProvider::new("legal-precedents", vec![external_doc("p", "legal-precedents")]);
    let mut chain = FallbackChain::new();
    chain.push(provider.clone());

    let pipeline = QueryPipeline::new(store, chain);
    let answer = pipeline.answer("What are my rights when arrested?", Tier::Public).await;

    assert_eq!(answer.metadata.intent, "arrest_rights");
    assert_eq!(answer.metadata.sources, vec!["ACT-1A2B-X".to_string()]);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn empty_store_falls_back_to_providers() {
    let provider = CountingProvider::new(
        "legal-precedents",
        vec![external_doc("FIR precedent", "legal-precedents")],
    );
    let mut chain = FallbackChain::new();
    chain.push(provider.clone());

    let pipeline = QueryPipeline::new(FakeStore::empty(), chain);
    let answer = pipeline.answer("How do I file an FIR?", Tier::Public).await;

    assert_eq!(answer.metadata.intent, "fir_filing");
    assert!(answer.response.contains("How to File an FIR"));
    assert_eq!(answer.metadata.sources, vec!["external".to_string()]);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn unmatched_query_with_no_sources_apologizes() {
    let pipeline = QueryPipeline::new(FakeStore::empty(), FallbackChain::new());
    let answer = pipeline
        .answer("Best banana smoothie recipe?", Tier::Public)
        .await;

    assert_eq!(answer.metadata.intent, "general_info");
    assert_eq!(answer.response, NO_SOURCES_RESPONSE);
    assert!(answer.metadata.sources.is_empty());
    assert!((answer.metadata.confidence - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn restricted_provider_wins_for_judiciary_only() {
    let gated = CountingProvider::restricted(
        "crime-check",
        Tier::Legal,
        vec![external_doc("Record lookup", "crime-check")],
    );
    let open = CountingProvider::new(
        "web-search",
        vec![external_doc("Web result", "web-search")],
    );
    let mut chain = FallbackChain::new();
    chain.push(gated.clone());
    chain.push(open.clone());

    let pipeline = QueryPipeline::new(FakeStore::empty(), chain);

    let answer = pipeline.answer("criminal record verification", Tier::Public).await;
    assert!(!answer.metadata.sources.is_empty());
    assert_eq!(gated.calls(), 0);
    assert_eq!(open.calls(), 1);

    let answer = pipeline
        .answer("criminal record verification", Tier::Judiciary)
        .await;
    assert!(!answer.metadata.sources.is_empty());
    assert_eq!(gated.calls(), 1);
    assert_eq!(open.calls(), 1);
}

#[tokio::test]
async fn failing_store_degrades_to_fallback() {
    let provider = CountingProvider::new(
        "legal-data",
        vec![external_doc("Legal aid scheme", "legal-data")],
    );
    let mut chain = FallbackChain::new();
    chain.push(provider.clone());

    let pipeline = QueryPipeline::new(FakeStore::failing(), chain);
    let answer = pipeline.answer("free legal aid eligibility", Tier::Public).await;

    assert_eq!(answer.metadata.intent, "legal_aid");
    assert_eq!(answer.metadata.sources, vec!["external".to_string()]);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn failing_store_and_empty_chain_apologizes() {
    let pipeline = QueryPipeline::new(FakeStore::failing(), FallbackChain::new());
    let answer = pipeline.answer("stamp duty rates", Tier::Judiciary).await;

    assert_eq!(answer.response, NO_SOURCES_RESPONSE);
    assert!(answer.metadata.sources.is_empty());
}

#[tokio::test]
async fn general_info_answer_is_extractive() {
    let store = FakeStore::with_docs(vec![internal_doc(
        "CIR-99-A",
        "Court fee circular",
        "Court fees are revised every financial year by the state government. \
         Payment can be made online through the e-courts portal.",
    )]);
    let pipeline = QueryPipeline::new(store, FallbackChain::new());
    let answer = pipeline.answer("court fees information", Tier::Public).await;

    assert_eq!(answer.metadata.intent, "general_info");
    assert!(answer.response.contains("revised every financial year"));
    assert!(answer.response.contains("e-courts portal"));
    assert!(answer.response.ends_with(FOLLOW_UP_PROMPT));
    assert_eq!(answer.metadata.sources, vec!["CIR-99-A".to_string()]);
}

#[test]
fn error_response_shape() {
    let r = error_response();
    assert_eq!(r.metadata.intent, "error");
    assert_eq!(r.metadata.confidence, 0.0);
    assert!(r.metadata.sources.is_empty());
    assert!(!r.response.is_empty());
}
