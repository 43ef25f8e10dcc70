//! HTTP clients for the external fallback sources, plus the wiring that
//! assembles them into an ordered chain from configuration.

pub mod crimecheck;
pub mod legaldata;
pub mod precedents;
pub mod websearch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use jasper_core::config::Config;
use jasper_core::provider::FallbackChain;

use crate::crimecheck::CrimeCheckClient;
use crate::legaldata::LegalDataClient;
use crate::precedents::PrecedentsClient;
use crate::websearch::WebSearchClient;

/// Build the fallback chain in consultation order: crime records, then
/// precedents, then general legal data, with web search as the last
/// resort. Disabled providers are left out entirely.
pub fn build_chain(config: &Config) -> Result<FallbackChain> {
    let timeout = Duration::from_secs(config.provider_timeout_s);
    let mut chain = FallbackChain::new();

    if config.crimecheck.enabled {
        chain.push(Arc::new(CrimeCheckClient::new(
            &config.crimecheck.url,
            &config.crimecheck.api_key,
            timeout,
        )?));
    }
    if config.blackbox.enabled {
        chain.push(Arc::new(PrecedentsClient::new(
            &config.blackbox.url,
            &config.blackbox.api_key,
            timeout,
        )?));
        chain.push(Arc::new(LegalDataClient::new(
            &config.blackbox.url,
            &config.blackbox.api_key,
            timeout,
        )?));
    }
    if config.web_search.enabled {
        if config.web_search.api_key.is_empty() || config.web_search.search_engine_id.is_empty() {
            warn!("web search enabled but not configured, leaving it out of the chain");
        } else {
            chain.push(Arc::new(WebSearchClient::new(
                &config.web_search.url,
                &config.web_search.api_key,
                &config.web_search.search_engine_id,
                timeout,
            )?));
        }
    }

    info!("fallback chain ready with {} providers", chain.len());
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use jasper_core::config::{ProviderConfig, WebSearchConfig};

    use super::*;

    fn test_config() -> Config {
        Config {
            web_bind: "127.0.0.1".into(),
            web_port: 3030,
            data_dir: "store".into(),
            search_limit: 5,
            provider_timeout_s: 5,
            crimecheck: ProviderConfig {
                url: "https://crime.example.com".into(),
                api_key: "k1".into(),
                enabled: true,
            },
            blackbox: ProviderConfig {
                url: "https://blackbox.example.com".into(),
                api_key: "k2".into(),
                enabled: true,
            },
            web_search: WebSearchConfig {
                url: "https://search.example.com".into(),
                api_key: "k3".into(),
                search_engine_id: "cx".into(),
                enabled: true,
            },
        }
    }

    #[test]
    fn full_chain_in_consultation_order() {
        let chain = build_chain(&test_config()).unwrap();
        assert_eq!(chain.len(), 4);
        assert!(chain.get(crimecheck::PROVIDER_NAME).is_some());
        assert!(chain.get(precedents::PROVIDER_NAME).is_some());
        assert!(chain.get(legaldata::PROVIDER_NAME).is_some());
        assert!(chain.get(websearch::PROVIDER_NAME).is_some());
    }

    #[test]
    fn disabled_providers_are_left_out() {
        let mut config = test_config();
        config.crimecheck.enabled = false;
        config.blackbox.enabled = false;
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain.get(crimecheck::PROVIDER_NAME).is_none());
    }

    #[test]
    fn unconfigured_web_search_is_skipped() {
        let mut config = test_config();
        config.web_search.api_key.clear();
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.len(), 3);
        assert!(chain.get(websearch::PROVIDER_NAME).is_none());
    }
}
