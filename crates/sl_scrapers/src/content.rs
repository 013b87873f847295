use reqwest::Client;
use scraper::{Html, Selector};
use sl_core::text::truncate_chars;
use sl_core::{ArticleContent, Result};
use tracing::{debug, warn};

use crate::client::FetchConfig;

/// Article body containers, most specific first
pub const CONTENT_SELECTORS: &[&str] = &[
    "div.article-content",
    "div.entry-content",
    "article",
    "div.content",
    "div.post-content",
];

/// Downloads article pages and pulls out their body text.
///
/// Never fails: an unreachable page or one without a recognizable body
/// comes back as [`ArticleContent::Unavailable`].
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl ContentFetcher {
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub async fn fetch(&self, url: &str) -> ArticleContent {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.get_page(url).await {
                Ok(html) => {
                    let content = extract_content(&html, self.config.max_content_chars);
                    if !content.is_available() {
                        warn!("Content container not found for URL: {}", url);
                    }
                    return content;
                }
                Err(e) => {
                    warn!("Attempt {}/{} failed to fetch article content from {}: {}", attempt, attempts, url, e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        ArticleContent::Unavailable
    }

    async fn get_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Text of the first non-empty element matching [`CONTENT_SELECTORS`], capped at `max_chars`.
pub fn extract_content(html: &str, max_chars: usize) -> ArticleContent {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                debug!("Found content using selector '{}' ({} chars)", selector_str, text.chars().count());
                return ArticleContent::Available(truncate_chars(&text, max_chars).to_string());
            }
        }
    }

    ArticleContent::Unavailable
}
