use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use sl_core::Result;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Knobs for every outbound scrape
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    /// Total attempts per article page, including the first one
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub max_content_chars: usize,
    pub max_concurrent_fetches: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            max_content_chars: 5000,
            max_concurrent_fetches: 5,
        }
    }
}

/// Builds the one HTTP client shared by the fetcher, listing sources and model providers.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}
