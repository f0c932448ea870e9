use crate::model::{ScrapeRequest, ScraperError};
use crate::parser::SourceProfile;
use crate::scraper::traits::Scraper;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124";

#[derive(Clone)]
pub struct ScraperImpl {
    client: Client,
}

impl ScraperImpl {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout
    } else {
        ScraperError::Http(e.to_string())
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, profile: &SourceProfile, req: &ScrapeRequest) -> Result<String, ScraperError> {
        let url = profile.search_url(req);
        info!("Fetching {}", url);

        let response = self.client.get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
