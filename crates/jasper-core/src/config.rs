use std::collections::HashMap;

use anyhow::Result;

use crate::store::SqliteStore;

/// Connection settings for one external fallback source.
/// A disabled provider is skipped entirely when building the chain.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub url: String,
    pub api_key: String,
    pub enabled: bool,
}

/// Google Custom Search needs an engine ID on top of the key.
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    pub url: String,
    pub api_key: String,
    pub search_engine_id: String,
    pub enabled: bool,
}

/// Full application configuration.
/// Non-sensitive fields are seeded to and loaded from the DB `config`
/// table. Sensitive fields (API keys) come from env/.env only.
#[derive(Debug, Clone)]
pub struct Config {
    pub web_bind: String,
    pub web_port: u16,
    pub data_dir: String,

    // Pipeline tuning
    pub search_limit: usize,
    /// Per-call timeout for external provider requests, in seconds.
    pub provider_timeout_s: u64,

    // Fallback providers. Precedents and legal-data share the BlackBox
    // endpoint; they differ only in path.
    pub crimecheck: ProviderConfig,
    pub blackbox: ProviderConfig,
    pub web_search: WebSearchConfig,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_bool(key: &str, dotenv: &HashMap<String, String>, default: bool) -> bool {
    match get(key, dotenv).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        Some(_) => default,
        None => default,
    }
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_usize(key: &str, dotenv: &HashMap<String, String>, default: usize) -> usize {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();

        Ok(Config {
            web_bind: get_str("WEB_BIND", &dotenv, "127.0.0.1"),
            web_port: get_u16("WEB_PORT", &dotenv, 3030),
            data_dir: get_str("DATA_DIR", &dotenv, "store"),
            search_limit: get_usize("SEARCH_LIMIT", &dotenv, 5),
            provider_timeout_s: get_u64("PROVIDER_TIMEOUT_S", &dotenv, 5),
            crimecheck: ProviderConfig {
                url: get_str(
                    "CRIMECHECK_API_URL",
                    &dotenv,
                    "https://api.crimecheck.example.com",
                ),
                api_key: get_str("CRIMECHECK_API_KEY", &dotenv, ""),
                enabled: get_bool("CRIMECHECK_ENABLED", &dotenv, true),
            },
            blackbox: ProviderConfig {
                url: get_str(
                    "BLACKBOX_API_URL",
                    &dotenv,
                    "https://api.blackbox.example.com",
                ),
                api_key: get_str("BLACKBOX_API_KEY", &dotenv, ""),
                enabled: get_bool("BLACKBOX_ENABLED", &dotenv, true),
            },
            web_search: WebSearchConfig {
                url: get_str(
                    "GOOGLE_SEARCH_URL",
                    &dotenv,
                    "https://www.googleapis.com/customsearch/v1",
                ),
                api_key: get_str("GOOGLE_SEARCH_API_KEY", &dotenv, ""),
                search_engine_id: get_str("GOOGLE_SEARCH_ENGINE_ID", &dotenv, ""),
                enabled: get_bool("GOOGLE_SEARCH_ENABLED", &dotenv, true),
            },
        })
    }

    /// Write all non-sensitive fields to DB if not already present
    /// (first-run seeding).
    pub fn seed_db(&self, store: &SqliteStore) -> Result<()> {
        let entries: &[(&str, String)] = &[
            ("web_bind", self.web_bind.clone()),
            ("web_port", self.web_port.to_string()),
            ("search_limit", self.search_limit.to_string()),
            ("provider_timeout_s", self.provider_timeout_s.to_string()),
            ("crimecheck_url", self.crimecheck.url.clone()),
            ("crimecheck_enabled", self.crimecheck.enabled.to_string()),
            ("blackbox_url", self.blackbox.url.clone()),
            ("blackbox_enabled", self.blackbox.enabled.to_string()),
            ("web_search_url", self.web_search.url.clone()),
            (
                "web_search_engine_id",
                self.web_search.search_engine_id.clone(),
            ),
            ("web_search_enabled", self.web_search.enabled.to_string()),
        ];
        for (key, value) in entries {
            store.seed_config(key, value)?;
        }
        Ok(())
    }

    /// Return a new Config with non-sensitive fields overridden from DB
    /// values. API keys stay env-only.
    pub fn load_from_db(&self, store: &SqliteStore) -> Self {
        let mut c = self.clone();
        let get = |key: &str| store.get_config(key).ok().flatten();
        let get_str = |key: &str, cur: &str| get(key).unwrap_or_else(|| cur.to_string());
        let get_bool =
            |key: &str, cur: bool| get(key).map(|v| v == "true" || v == "1").unwrap_or(cur);

        c.web_bind = get_str("web_bind", &c.web_bind);
        if let Some(v) = get("web_port").and_then(|s| s.parse().ok()) {
            c.web_port = v;
        }
        if let Some(v) = get("search_limit").and_then(|s| s.parse().ok()) {
            c.search_limit = v;
        }
        if let Some(v) = get("provider_timeout_s").and_then(|s| s.parse().ok()) {
            c.provider_timeout_s = v;
        }
        c.crimecheck.url = get_str("crimecheck_url", &c.crimecheck.url);
        c.crimecheck.enabled = get_bool("crimecheck_enabled", c.crimecheck.enabled);
        c.blackbox.url = get_str("blackbox_url", &c.blackbox.url);
        c.blackbox.enabled = get_bool("blackbox_enabled", c.blackbox.enabled);
        c.web_search.url = get_str("web_search_url", &c.web_search.url);
        c.web_search.search_engine_id =
            get_str("web_search_engine_id", &c.web_search.search_engine_id);
        c.web_search.enabled = get_bool("web_search_enabled", c.web_search.enabled);
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            web_bind: "127.0.0.1".into(),
            web_port: 3030,
            data_dir: "store".into(),
            search_limit: 5,
            provider_timeout_s: 5,
            crimecheck: ProviderConfig {
                url: "https://crime.example.com".into(),
                api_key: "secret-1".into(),
                enabled: true,
            },
            blackbox: ProviderConfig {
                url: "https://blackbox.example.com".into(),
                api_key: "secret-2".into(),
                enabled: true,
            },
            web_search: WebSearchConfig {
                url: "https://search.example.com".into(),
                api_key: "secret-3".into(),
                search_engine_id: "cx-1".into(),
                enabled: true,
            },
        }
    }

    #[test]
    fn seed_then_load_round_trips() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let config = base_config();
        config.seed_db(&store).unwrap();

        let loaded = config.load_from_db(&store);
        assert_eq!(loaded.search_limit, 5);
        assert_eq!(loaded.crimecheck.url, "https://crime.example.com");
        // Keys never touch the DB.
        assert_eq!(store.get_config("crimecheck_api_key").unwrap(), None);
    }

    #[test]
    fn db_values_override_env_values() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let config = base_config();
        config.seed_db(&store).unwrap();
        store.set_config("search_limit", "9").unwrap();
        store.set_config("crimecheck_enabled", "false").unwrap();

        let loaded = config.load_from_db(&store);
        assert_eq!(loaded.search_limit, 9);
        assert!(!loaded.crimecheck.enabled);
        // API keys stay whatever the env said.
        assert_eq!(loaded.crimecheck.api_key, "secret-1");
    }

    #[test]
    fn seeding_twice_keeps_operator_edits() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let config = base_config();
        config.seed_db(&store).unwrap();
        store.set_config("web_port", "8080").unwrap();
        config.seed_db(&store).unwrap();

        let loaded = config.load_from_db(&store);
        assert_eq!(loaded.web_port, 8080);
    }
}
