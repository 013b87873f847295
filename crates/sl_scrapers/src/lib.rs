pub mod client;
pub mod content;
pub mod listing;
pub mod scrapers;

#[cfg(test)]
mod test_utils;

pub use client::{build_client, FetchConfig};
pub use content::ContentFetcher;
pub use listing::NewsLister;
pub use scrapers::{ArticleSource, FinvizScraper, TickerLookup, YahooFinanceClient};

pub mod prelude {
    pub use super::scrapers::{ArticleSource, TickerLookup};
    pub use sl_core::{Article, Error, ListingQuery, Result};
}
