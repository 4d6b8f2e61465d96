use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;

use orderflow_ai::Explainer;
use orderflow_infra::{
    AppConfig, InMemoryIntakeStore, IntakeStore, OrderWorkflow, SeedData, SqliteIntakeStore, StoreBackend,
    seed_if_empty,
};

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub workflow: OrderWorkflow,
    /// Browser origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<HeaderValue>,
}

impl AppServices {
    pub fn new(store: Arc<dyn IntakeStore>, explainer: Arc<dyn Explainer>) -> Self {
        Self {
            workflow: OrderWorkflow::new(store, explainer),
            cors_origins: Vec::new(),
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<HeaderValue>) -> Self {
        self.cors_origins = origins;
        self
    }
}

/// Open the configured store, seed it if asked, and build the explainer.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn IntakeStore> = match &config.store {
        StoreBackend::Memory => {
            tracing::info!("using in-memory intake store");
            Arc::new(InMemoryIntakeStore::new())
        }
        StoreBackend::Sqlite(url) => {
            tracing::info!(%url, "opening sqlite intake store");
            let store = SqliteIntakeStore::connect(url)
                .await
                .with_context(|| format!("failed to open intake store at {url}"))?;
            Arc::new(store)
        }
    };

    if let Some(path) = &config.seed_path {
        let seed = SeedData::load(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        seed_if_empty(store.as_ref(), &seed)
            .await
            .context("failed to seed intake store")?;
    }

    if !config.explain.is_enabled() {
        tracing::warn!("GROQ_API_KEY not set; decisions will be returned without explanations");
    }
    let explainer = config
        .explain
        .build_explainer()
        .context("failed to build explanation client")?;

    let cors_origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(AppServices::new(store, explainer).with_cors_origins(cors_origins))
}
