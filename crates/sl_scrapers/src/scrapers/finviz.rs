use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use reqwest::Client;
use scraper::Html;
use sl_core::types::UNKNOWN_AUTHOR;
use sl_core::{Article, ListingQuery, Result};
use tracing::{debug, warn};

use super::utils::{absolute_url, selector, squash_whitespace};
use super::ArticleSource;

const FULL_FORMAT: &str = "%b-%d-%y %I:%M%p";
const TIME_FORMAT: &str = "%I:%M%p";

/// Scrapes the news table on a Finviz quote page.
#[derive(Debug, Clone)]
pub struct FinvizScraper {
    client: Client,
    base_url: String,
}

impl FinvizScraper {
    pub const BASE_URL: &'static str = "https://finviz.com/";

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

    fn quote_url(&self, ticker: &str) -> String {
        format!("{}/quote.ashx?t={}", self.base_url.trim_end_matches('/'), ticker)
    }
}

#[async_trait]
impl ArticleSource for FinvizScraper {
    fn source(&self) -> &str {
        "Finviz"
    }

    async fn list_articles(&self, query: &ListingQuery) -> Result<Vec<Article>> {
        let url = self.quote_url(&query.ticker);
        debug!("Fetching news listing from {}", url);

        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_news_table(&html, &self.base_url, query, Utc::now())
    }
}

/// Parses the quote page news table into articles.
///
/// Rows are kept in page order, skipping duplicates by title, rows without a
/// title or link, and rows published before the query window. A page without
/// a news table yields no articles.
pub fn parse_news_table(
    html: &str,
    base_url: &str,
    query: &ListingQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Article>> {
    let table_selector = selector("table#news-table, table.news-table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;
    let source_selector = selector(".news-link-right span")?;

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_selector).next() else {
        warn!("No news table found in HTML");
        return Ok(Vec::new());
    };

    let mut articles = Vec::new();
    let mut seen_titles = HashSet::new();
    let mut current_date = None;

    for row in table.select(&row_selector) {
        if articles.len() >= query.count {
            break;
        }

        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }

        let raw_stamp = cells[0].text().collect::<String>();
        let published_at = parse_published_at(&raw_stamp, &mut current_date, now);

        let anchor = cells[1].select(&link_selector).next();
        let title = squash_whitespace(
            &anchor
                .map(|a| a.text().collect::<String>())
                .unwrap_or_else(|| cells[1].text().collect::<String>()),
        );
        let Some(href) = anchor.and_then(|a| a.value().attr("href")) else {
            continue;
        };
        if title.is_empty() || href.trim().is_empty() {
            continue;
        }
        if !query.includes(&published_at) {
            continue;
        }
        if !seen_titles.insert(title.clone()) {
            continue;
        }

        let author = cells[1]
            .select(&source_selector)
            .next()
            .map(|el| squash_whitespace(&el.text().collect::<String>()))
            .map(|s| s.trim_start_matches('(').trim_end_matches(')').trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let mut article = Article::new(title, absolute_url(base_url, href.trim())?, published_at);
        article.author = author;
        articles.push(article);
    }

    Ok(articles)
}

/// Parses a news table timestamp.
///
/// Full stamps (`Oct-14-24 09:30AM`) set the running date, `Today 09:30AM`
/// uses today, and bare times (`09:30AM`) reuse the last date seen or today.
/// Anything else is taken as `now`.
pub fn parse_published_at(
    raw: &str,
    current_date: &mut Option<NaiveDate>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let raw = squash_whitespace(raw);

    if let Ok(stamp) = NaiveDateTime::parse_from_str(&raw, FULL_FORMAT) {
        *current_date = Some(stamp.date());
        return Utc.from_utc_datetime(&stamp);
    }

    let (date, time) = match raw.strip_prefix("Today ") {
        Some(rest) => {
            let today = now.date_naive();
            *current_date = Some(today);
            (today, rest)
        }
        None => (current_date.unwrap_or_else(|| now.date_naive()), raw.as_str()),
    };

    match NaiveTime::parse_from_str(time, TIME_FORMAT) {
        Ok(time) => Utc.from_utc_datetime(&date.and_time(time)),
        Err(_) => {
            debug!("Unparseable timestamp '{}', using now", raw);
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table id="news-table" class="fullview-news-outer news-table">
            <tr>
                <td align="right">May-10-24 09:30AM</td>
                <td><div class="news-link-container">
                    <div class="news-link-left"><a class="tab-link-news" href="https://www.reuters.com/apple-earnings">Apple beats estimates</a></div>
                    <div class="news-link-right"><span>(Reuters)</span></div>
                </div></td>
            </tr>
            <tr>
                <td align="right">08:15AM</td>
                <td><a href="/news/123/apple-buyback">Apple announces buyback</a></td>
            </tr>
            <tr>
                <td align="right">07:00AM</td>
                <td><a href="https://example.com/dup">Apple beats estimates</a></td>
            </tr>
            <tr>
                <td align="right">May-01-24 10:00PM</td>
                <td><a href="https://example.com/old">Old news</a></td>
            </tr>
            <tr>
                <td align="right">May-10-24 06:00AM</td>
                <td>No link here</td>
            </tr>
            <tr><td>single cell</td></tr>
        </table>
        </body></html>
    "#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 12, 15, 0, 0).unwrap()
    }

    fn query(count: usize) -> ListingQuery {
        ListingQuery::new("AAPL", count, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap())
    }

    #[test]
    fn test_parse_news_table() {
        let articles = parse_news_table(PAGE, FinvizScraper::BASE_URL, &query(10), now()).unwrap();
        assert_eq!(articles.len(), 2);

        assert_eq!(articles[0].title, "Apple beats estimates");
        assert_eq!(articles[0].link, "https://www.reuters.com/apple-earnings");
        assert_eq!(articles[0].author, "Reuters");
        assert_eq!(articles[0].published_at, Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap());

        assert_eq!(articles[1].title, "Apple announces buyback");
        assert_eq!(articles[1].link, "https://finviz.com/news/123/apple-buyback");
        assert_eq!(articles[1].author, UNKNOWN_AUTHOR);
        assert_eq!(articles[1].published_at, Utc.with_ymd_and_hms(2024, 5, 10, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_respects_start_date() {
        let query = query(10);
        let articles = parse_news_table(PAGE, FinvizScraper::BASE_URL, &query, now()).unwrap();
        assert!(articles.iter().all(|a| a.published_at >= query.window_start()));
        assert!(!articles.iter().any(|a| a.title == "Old news"));
    }

    #[test]
    fn test_parse_keeps_first_duplicate() {
        let articles = parse_news_table(PAGE, FinvizScraper::BASE_URL, &query(10), now()).unwrap();
        let dups: Vec<_> = articles.iter().filter(|a| a.title == "Apple beats estimates").collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].link, "https://www.reuters.com/apple-earnings");
    }

    #[test]
    fn test_parse_stops_at_count() {
        let articles = parse_news_table(PAGE, FinvizScraper::BASE_URL, &query(1), now()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Apple beats estimates");
    }

    #[test]
    fn test_parse_without_table() {
        let articles = parse_news_table("<html><body></body></html>", FinvizScraper::BASE_URL, &query(5), now()).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_published_at_formats() {
        let mut current = None;

        let full = parse_published_at("Oct-14-24 09:30AM", &mut current, now());
        assert_eq!(full, Utc.with_ymd_and_hms(2024, 10, 14, 9, 30, 0).unwrap());
        assert_eq!(current, NaiveDate::from_ymd_opt(2024, 10, 14));

        let carried = parse_published_at(" 04:05PM ", &mut current, now());
        assert_eq!(carried, Utc.with_ymd_and_hms(2024, 10, 14, 16, 5, 0).unwrap());

        let today = parse_published_at("Today 11:20AM", &mut current, now());
        assert_eq!(today, Utc.with_ymd_and_hms(2024, 5, 12, 11, 20, 0).unwrap());

        let garbage = parse_published_at("yesterday-ish", &mut current, now());
        assert_eq!(garbage, now());
    }

    #[test]
    fn test_time_only_defaults_to_today() {
        let mut current = None;
        let stamp = parse_published_at("09:15AM", &mut current, now());
        assert_eq!(stamp, Utc.with_ymd_and_hms(2024, 5, 12, 9, 15, 0).unwrap());
    }

    #[test]
    fn test_quote_url() {
        let scraper = FinvizScraper::new(Client::new());
        assert_eq!(scraper.quote_url("AAPL"), "https://finviz.com/quote.ashx?t=AAPL");
    }
}
