// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use scraper::Html;

use crate::config::ScraperConfig;
use crate::error::Result;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and parse it as HTML.
///
/// Any connectivity failure propagates; the watcher has no retry policy.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<Html> {
    let text = client.get(url).send().await?.text().await?;
    Ok(Html::parse_document(&text))
}
