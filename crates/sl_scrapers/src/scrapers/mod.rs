use async_trait::async_trait;
use scraper::Selector;
use sl_core::{Article, Error, ListingQuery, Result, Suggestion};
use url::Url;

pub mod finviz;
pub mod yahoo;

pub use finviz::FinvizScraper;
pub use yahoo::YahooFinanceClient;

/// A place that lists recent news articles for a ticker
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Returns the name of the news source
    fn source(&self) -> &str;

    /// Lists up to `query.count` articles published on or after `query.start_date`.
    /// Content may be left unavailable; callers attach it separately.
    async fn list_articles(&self, query: &ListingQuery) -> Result<Vec<Article>>;
}

/// Resolves a partial ticker or company name to candidate symbols
#[async_trait]
pub trait TickerLookup: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>>;
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    pub fn selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", selector, e)))
    }

    /// Makes `href` absolute against `base`
    pub fn absolute_url(base: &str, href: &str) -> Result<String> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Ok(href.to_string());
        }
        let base = Url::parse(base).map_err(|e| Error::InvalidUrl(format!("{}: {}", base, e)))?;
        base.join(href)
            .map(String::from)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", href, e)))
    }

    /// Collapses runs of whitespace into single spaces
    pub fn squash_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
