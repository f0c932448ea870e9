// Core structs: ItemRecord, CarPart, ScrapeRequest and the error types
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN: &str = "Неизвестно";
pub const NOT_SPECIFIED: &str = "Не указано";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";
pub const NO_LINK: &str = "#";
pub const CURRENCY: &str = "₽";

/// One listing extracted from an item card. Every field is always filled,
/// falling back to a sentinel when the card lacks the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub brand: String,
    pub price: String,
    pub location: String,
    pub date: String,
}

/// Response shape of `/parts/{brand}/{model}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarPart {
    pub title: String,
    pub link: String,
    pub article: String,
    pub brand: String,
    pub country: String,
    pub price: String,
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub search: String,
    pub model: String,
    pub page: u32,
}

impl ScrapeRequest {
    pub fn new(search: impl Into<String>, model: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            model: model.into(),
            page,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("upstream request failed: {0}")]
    Http(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream request timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    #[error("invalid base url `{0}`")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache store is closed")]
    Closed,
    #[error("cache store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] ScraperError),
    #[error(transparent)]
    Cache(#[from] StorageError),
}
