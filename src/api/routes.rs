use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::{ApiError, BRANDS_NOT_FOUND, INVALID_PAGE, PARTS_NOT_FOUND, SOURCE_NOT_FOUND};
use super::AppState;
use crate::model::{CarPart, ItemRecord, ScrapeRequest};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

async fn cached_parts(
    state: &AppState,
    source: &str,
    request: ScrapeRequest,
) -> Result<Json<Vec<ItemRecord>>, ApiError> {
    // pages are 1-based upstream
    if request.page == 0 {
        return Err(ApiError::BadRequest(INVALID_PAGE.to_string()));
    }

    let fetcher = state
        .fetcher(source)
        .ok_or_else(|| ApiError::NotFound(SOURCE_NOT_FOUND.to_string()))?;

    let items = fetcher.fetch_cached(&request).await?;
    if items.is_empty() {
        debug!("No items for {}", fetcher.cache_key(&request));
        return Err(ApiError::NotFound(PARTS_NOT_FOUND.to_string()));
    }

    info!("Serving {} items for {}", items.len(), fetcher.cache_key(&request));
    Ok(Json(items))
}

/// GET /drom/{search_string}/{model}?page=N
pub async fn drom_parts(
    State(state): State<AppState>,
    Path((search_string, model)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ItemRecord>>, ApiError> {
    cached_parts(&state, "drom", ScrapeRequest::new(search_string, model, params.page)).await
}

/// GET /sources/{source}/{search_string}/{model}?page=N
pub async fn source_parts(
    State(state): State<AppState>,
    Path((source, search_string, model)): Path<(String, String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ItemRecord>>, ApiError> {
    cached_parts(&state, &source, ScrapeRequest::new(search_string, model, params.page)).await
}

/// GET /sources
pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.source_ids())
}

/// GET /parts/{brand}/{model}
///
/// No catalogue source is wired up for this route yet, so it always answers 404.
pub async fn car_parts(
    Path((brand, model)): Path<(String, String)>,
) -> Result<Json<Vec<CarPart>>, ApiError> {
    debug!("Parts lookup for {} {} has no source", brand, model);
    Err(ApiError::NotFound(PARTS_NOT_FOUND.to_string()))
}

/// GET /brands
pub async fn car_brands() -> Result<Json<Vec<String>>, ApiError> {
    Err(ApiError::NotFound(BRANDS_NOT_FOUND.to_string()))
}
