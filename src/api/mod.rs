//! HTTP surface: maps routes onto the cache-backed fetchers

pub mod error;
pub mod routes;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::CachedFetcher;
use crate::model::ParserError;
use crate::parser::SourceProfile;
use crate::scraper::Scraper;
use crate::storage::CacheStore;

pub use error::ApiError;

/// Shared application state: one fetcher per source id.
#[derive(Clone)]
pub struct AppState {
    fetchers: Arc<BTreeMap<String, Arc<CachedFetcher>>>,
}

impl AppState {
    pub fn new(fetchers: Vec<CachedFetcher>) -> Self {
        let fetchers = fetchers
            .into_iter()
            .map(|f| (f.profile().id.clone(), Arc::new(f)))
            .collect();
        Self {
            fetchers: Arc::new(fetchers),
        }
    }

    /// Builds a fetcher for every profile, all sharing `scraper` and `store`.
    pub fn from_profiles(
        profiles: Vec<SourceProfile>,
        scraper: Arc<dyn Scraper>,
        store: Arc<dyn CacheStore>,
    ) -> Result<Self, ParserError> {
        let fetchers = profiles
            .into_iter()
            .map(|p| CachedFetcher::new(p, scraper.clone(), store.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(fetchers))
    }

    pub fn fetcher(&self, source: &str) -> Option<Arc<CachedFetcher>> {
        self.fetchers.get(source).cloned()
    }

    pub fn source_ids(&self) -> Vec<String> {
        self.fetchers.keys().cloned().collect()
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/drom/:search_string/:model", get(routes::drom_parts))
        .route("/sources", get(routes::list_sources))
        .route(
            "/sources/:source/:search_string/:model",
            get(routes::source_parts),
        )
        .route("/parts/:brand/:model", get(routes::car_parts))
        .route("/brands", get(routes::car_brands))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
