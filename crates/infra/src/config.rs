//! Process configuration read from the environment.
//!
//! Built once at startup and handed down; nothing else reads env vars.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use orderflow_ai::chat::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use orderflow_ai::{AiError, ChatCompletionsConfig, ChatCompletionsExplainer, DisabledExplainer, Explainer, RetryPolicy};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://orderflow.db";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_EXPLAIN_TIMEOUT_SECS: u64 = 10;

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(String),
}

impl StoreBackend {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(raw.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExplainConfig {
    /// `None` disables explanations.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub http_port: u16,
    pub seed_path: Option<PathBuf>,
    /// Allowed browser origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub explain: ExplainConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let store = StoreBackend::parse(
            &get("ORDERFLOW_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        );
        let http_port = parse_or("HTTP_PORT", get("HTTP_PORT"), DEFAULT_HTTP_PORT)?;
        let timeout_secs = parse_or(
            "ORDERFLOW_EXPLAIN_TIMEOUT_SECS",
            get("ORDERFLOW_EXPLAIN_TIMEOUT_SECS"),
            DEFAULT_EXPLAIN_TIMEOUT_SECS,
        )?;
        let max_retries = parse_or(
            "ORDERFLOW_EXPLAIN_MAX_RETRIES",
            get("ORDERFLOW_EXPLAIN_MAX_RETRIES"),
            0u32,
        )?;

        Ok(Self {
            store,
            http_port,
            seed_path: get("ORDERFLOW_SEED_PATH").map(PathBuf::from),
            cors_origins: get("ORDERFLOW_CORS_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            explain: ExplainConfig {
                api_key: get("GROQ_API_KEY").map(|k| k.trim().to_string()),
                base_url: get("ORDERFLOW_EXPLAIN_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: get("ORDERFLOW_EXPLAIN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
                max_retries,
            },
        })
    }
}

impl ExplainConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// The explainer this configuration describes. Without an API key the
    /// result always reports `NotConfigured`.
    pub fn build_explainer(&self) -> Result<Arc<dyn Explainer>, AiError> {
        let Some(api_key) = &self.api_key else {
            return Ok(Arc::new(DisabledExplainer));
        };

        let retry = if self.max_retries == 0 {
            RetryPolicy::none()
        } else {
            RetryPolicy::new(self.max_retries, RETRY_BACKOFF)
        };

        let config = ChatCompletionsConfig::new(api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout)
            .with_retry(retry);

        Ok(Arc::new(ChatCompletionsExplainer::new(config)?))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Sqlite(DEFAULT_DATABASE_URL.to_string()));
        assert_eq!(cfg.http_port, 8080);
        assert!(cfg.seed_path.is_none());
        assert!(cfg.cors_origins.is_empty());
        assert!(!cfg.explain.is_enabled());
        assert_eq!(cfg.explain.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.explain.model, DEFAULT_MODEL);
        assert_eq!(cfg.explain.timeout, Duration::from_secs(10));
        assert_eq!(cfg.explain.max_retries, 0);
    }

    #[test]
    fn memory_selects_the_in_memory_store() {
        let cfg = config(&[("ORDERFLOW_DATABASE_URL", " Memory ")]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Memory);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("ORDERFLOW_DATABASE_URL", "sqlite:///tmp/x.db"),
            ("HTTP_PORT", "9090"),
            ("GROQ_API_KEY", "k"),
            ("ORDERFLOW_EXPLAIN_TIMEOUT_SECS", "3"),
            ("ORDERFLOW_EXPLAIN_MAX_RETRIES", "2"),
            ("ORDERFLOW_SEED_PATH", "seed.json"),
        ])
        .unwrap();
        assert_eq!(cfg.store, StoreBackend::Sqlite("sqlite:///tmp/x.db".to_string()));
        assert_eq!(cfg.http_port, 9090);
        assert_eq!(cfg.explain.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.explain.timeout, Duration::from_secs(3));
        assert_eq!(cfg.explain.max_retries, 2);
        assert_eq!(cfg.seed_path, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn cors_origins_are_comma_separated() {
        let cfg = config(&[(
            "ORDERFLOW_CORS_ORIGINS",
            "http://localhost:3000, https://shop.example.com,,",
        )])
        .unwrap();
        assert_eq!(cfg.cors_origins, vec!["http://localhost:3000", "https://shop.example.com"]);
    }

    #[test]
    fn blank_api_key_disables_explanations() {
        let cfg = config(&[("GROQ_API_KEY", "   ")]).unwrap();
        assert!(!cfg.explain.is_enabled());
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = config(&[("HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HTTP_PORT", .. }));
    }

    #[tokio::test]
    async fn missing_key_builds_a_disabled_explainer() {
        let cfg = config(&[]).unwrap();
        let explainer = cfg.explain.build_explainer().unwrap();
        let req = orderflow_ai::ExplanationRequest::new(orderflow_core::Decision::Hold, "bolt", 1);
        assert!(matches!(explainer.explain(&req).await, Err(AiError::NotConfigured)));
    }
}
