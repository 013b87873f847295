use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use sl_core::types::UNKNOWN_AUTHOR;
use sl_core::{Article, ListingQuery, Result, Suggestion};
use tracing::debug;

use super::{ArticleSource, TickerLookup};

const SUGGESTION_LIMIT: usize = 10;
const MIN_FEED_ITEMS: usize = 10;
const MAX_FEED_ITEMS: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Vec<QuoteItem>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteItem {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    #[serde(rename = "exchDisp")]
    pub exchange_display: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "quoteType")]
    pub quote_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub publisher: Option<String>,
    #[serde(rename = "providerPublishTime")]
    pub provider_publish_time: Option<i64>,
}

/// Yahoo Finance search API: ticker news feed and symbol lookup.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub const BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search(&self, query: &str, news_count: usize, quotes_count: usize) -> Result<SearchResponse> {
        let url = format!("{}/v1/finance/search", self.base_url.trim_end_matches('/'));
        let news_count = news_count.to_string();
        let quotes_count = quotes_count.to_string();

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("q", query),
                ("newsCount", news_count.as_str()),
                ("quotesCount", quotes_count.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        debug!("Yahoo search '{}' returned {} quotes, {} news items", query, response.quotes.len(), response.news.len());
        Ok(response)
    }
}

#[async_trait]
impl ArticleSource for YahooFinanceClient {
    fn source(&self) -> &str {
        "Yahoo Finance"
    }

    async fn list_articles(&self, query: &ListingQuery) -> Result<Vec<Article>> {
        let response = self.search(&query.ticker, feed_news_count(query.count), 0).await?;
        Ok(select_feed_articles(response.news, query, Utc::now()))
    }
}

#[async_trait]
impl TickerLookup for YahooFinanceClient {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        let response = self.search(query, 0, SUGGESTION_LIMIT).await?;
        Ok(to_suggestions(response.quotes))
    }
}

/// News items to request for a listing of `count`: twice the count, bounded.
fn feed_news_count(count: usize) -> usize {
    count.saturating_mul(2).clamp(MIN_FEED_ITEMS, MAX_FEED_ITEMS)
}

/// Picks feed items for a listing: newest first, within the window, up to
/// `query.count`. When nothing falls inside the window the most recent items
/// are used instead. Items without a timestamp count as published `now`.
pub fn select_feed_articles(items: Vec<NewsItem>, query: &ListingQuery, now: DateTime<Utc>) -> Vec<Article> {
    let mut articles: Vec<Article> = items
        .into_iter()
        .filter(|item| !item.title.trim().is_empty() && !item.link.trim().is_empty())
        .map(|item| {
            let published_at = item
                .provider_publish_time
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
                .unwrap_or(now);
            let mut article = Article::new(item.title.trim(), item.link.trim(), published_at);
            article.author = item
                .publisher
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
            article
        })
        .collect();

    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let in_window: Vec<Article> = articles
        .iter()
        .filter(|a| query.includes(&a.published_at))
        .take(query.count)
        .cloned()
        .collect();

    if in_window.is_empty() {
        articles.truncate(query.count);
        articles
    } else {
        in_window
    }
}

fn to_suggestions(quotes: Vec<QuoteItem>) -> Vec<Suggestion> {
    quotes
        .into_iter()
        .filter_map(|quote| {
            let symbol = quote.symbol.filter(|s| !s.is_empty())?;
            let name = quote
                .longname
                .or(quote.shortname)
                .unwrap_or_else(|| symbol.clone());
            Some(Suggestion {
                symbol,
                name,
                exchange: quote.exchange_display.or(quote.exchange),
                quote_type: quote.quote_type,
            })
        })
        .collect()
}
