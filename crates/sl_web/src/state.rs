use std::sync::Arc;

use sl_inference::Analyst;
use sl_scrapers::{ArticleSource, ContentFetcher, TickerLookup};

/// Everything the handlers need, built once at startup
pub struct AppState {
    pub lister: Arc<dyn ArticleSource>,
    pub lookup: Arc<dyn TickerLookup>,
    pub fetcher: ContentFetcher,
    pub analyst: Analyst,
}
