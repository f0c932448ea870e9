use crate::model::{ScrapeRequest, ScraperError};
use crate::parser::SourceProfile;

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    /// Fetches the raw search page of `profile` for `req`.
    async fn fetch(&self, profile: &SourceProfile, req: &ScrapeRequest) -> Result<String, ScraperError>;
}
