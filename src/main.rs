use parts_scraper::api::{create_app, AppState};
use parts_scraper::config::{load_config, AppConfig, CacheBackend};
use parts_scraper::parser::SourceProfile;
use parts_scraper::scraper::ScraperImpl;
use parts_scraper::storage::{CacheStore, MemoryCache, SqliteCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration; a missing file means defaults
    let config: AppConfig = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Connect the cache store
    let store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Sqlite => match SqliteCache::open(&config.cache_path) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                error!("Failed to open cache store: {}", e);
                return;
            }
        },
        CacheBackend::Memory => {
            info!("Using in-memory cache store");
            Arc::new(MemoryCache::new())
        }
    };

    let scraper = match ScraperImpl::new(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_seconds),
    ) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let state = match AppState::from_profiles(SourceProfile::builtin(), scraper, store.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Invalid source profile: {}", e);
            return;
        }
    };
    info!("Sources: {}", state.source_ids().join(", "));

    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr, e);
            return;
        }
    };
    info!("Listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Shutting down...");
    if let Err(e) = store.close().await {
        warn!("Failed to close cache store: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
