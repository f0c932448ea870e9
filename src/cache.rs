// Cache-backed fetching: key lookup, upstream fetch on miss, unconditional store
use crate::model::{FetchError, ItemRecord, ParserError, ScrapeRequest, StorageError};
use crate::parser::{ListingParser, Parser, SourceProfile};
use crate::scraper::Scraper;
use crate::storage::CacheStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Fetcher for one source profile. The store is shared across all fetchers.
pub struct CachedFetcher {
    profile: SourceProfile,
    parser: ListingParser,
    scraper: Arc<dyn Scraper>,
    store: Arc<dyn CacheStore>,
}

impl CachedFetcher {
    pub fn new(
        profile: SourceProfile,
        scraper: Arc<dyn Scraper>,
        store: Arc<dyn CacheStore>,
    ) -> Result<Self, ParserError> {
        let parser = ListingParser::new(&profile)?;
        Ok(Self {
            profile,
            parser,
            scraper,
            store,
        })
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// `<source>:<search>:<model>:<page>`, taken verbatim from the request.
    pub fn cache_key(&self, req: &ScrapeRequest) -> String {
        format!("{}:{}:{}:{}", self.profile.id, req.search, req.model, req.page)
    }

    /// Returns the cached items for `req`, fetching and storing them on a miss.
    /// Empty results are stored too; upstream failures are not.
    pub async fn fetch_cached(&self, req: &ScrapeRequest) -> Result<Vec<ItemRecord>, FetchError> {
        let key = self.cache_key(req);

        if let Some(cached) = self.store.get(&key).await? {
            match serde_json::from_str::<Vec<ItemRecord>>(&cached) {
                Ok(items) => {
                    info!("Returning cached data for key: {}", key);
                    return Ok(items);
                }
                Err(e) => warn!("Unreadable cache entry {}: {}, refetching", key, e),
            }
        }

        let items = self.fetch_fresh(req).await?;

        let serialized = serde_json::to_string(&items).map_err(StorageError::from)?;
        self.store.set(&key, &serialized).await?;
        info!("Cached {} items for key: {} without expiration", items.len(), key);

        Ok(items)
    }

    /// Fetches and parses one page, bypassing the cache.
    pub async fn fetch_fresh(&self, req: &ScrapeRequest) -> Result<Vec<ItemRecord>, FetchError> {
        let html = self.scraper.fetch(&self.profile, req).await?;
        Ok(self.parser.parse(&html))
    }
}
