use crate::adapters::cache::LruResponseCache;
use crate::adapters::pubchem::PubChemClient;
use crate::app::handlers;
use crate::core::augmentor::CompoundAugmentor;
use crate::core::preview::DocumentPreviewer;
use crate::core::{ConfigProvider, RegistryClient};
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// 每個請求共用的依賴
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RegistryClient>,
    pub augmentor: Arc<CompoundAugmentor>,
    pub previewer: Arc<DocumentPreviewer>,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        previewer: DocumentPreviewer,
        concurrent_requests: usize,
    ) -> Self {
        let augmentor =
            CompoundAugmentor::new(registry.clone()).with_concurrency(concurrent_requests);
        Self {
            registry,
            augmentor: Arc::new(augmentor),
            previewer: Arc::new(previewer),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut client = PubChemClient::new(config.base_url(), config.request_timeout())?;
        if config.cache_capacity() > 0 {
            client = client.with_cache(Arc::new(LruResponseCache::new(config.cache_capacity())));
        }
        tracing::debug!(
            "Registry client: base_url={}, timeout={:?}, cache_capacity={}",
            client.base_url(),
            config.request_timeout(),
            config.cache_capacity()
        );

        let previewer = DocumentPreviewer::new(config.request_timeout())?;
        Ok(Self::new(
            Arc::new(client),
            previewer,
            config.concurrent_requests(),
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/compounds/augment", post(handlers::augment_handler))
        .route(
            "/compounds/:namespace/:identifier",
            get(handlers::compound_record_handler),
        )
        .route("/preview", get(handlers::preview_handler))
        .with_state(state)
}
