use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sl_core::{Article, ListingQuery, Result};
use tracing::{info, warn};

use crate::content::ContentFetcher;
use crate::scrapers::ArticleSource;

/// Lists articles from a primary source, switching to a fallback feed when the
/// primary cannot be reached, and attaches scraped content to every article
/// before returning.
pub struct NewsLister {
    primary: Arc<dyn ArticleSource>,
    fallback: Arc<dyn ArticleSource>,
    fetcher: ContentFetcher,
}

impl NewsLister {
    pub fn new(primary: Arc<dyn ArticleSource>, fallback: Arc<dyn ArticleSource>, fetcher: ContentFetcher) -> Self {
        Self {
            primary,
            fallback,
            fetcher,
        }
    }

    /// Fetches missing content concurrently, keeping listing order
    async fn attach_content(&self, articles: Vec<Article>) -> Vec<Article> {
        let limit = self.fetcher.config().max_concurrent_fetches.max(1);

        stream::iter(articles)
            .map(|mut article| {
                let fetcher = self.fetcher.clone();
                async move {
                    if !article.content.is_available() {
                        article.content = fetcher.fetch(&article.link).await;
                    }
                    article
                }
            })
            .buffered(limit)
            .collect()
            .await
    }
}

#[async_trait]
impl ArticleSource for NewsLister {
    fn source(&self) -> &str {
        self.primary.source()
    }

    async fn list_articles(&self, query: &ListingQuery) -> Result<Vec<Article>> {
        let articles = match self.primary.list_articles(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(
                    "Failed to fetch articles from {}: {}. Falling back to {}",
                    self.primary.source(),
                    e,
                    self.fallback.source()
                );
                self.fallback.list_articles(query).await?
            }
        };

        info!("Found {} articles for {}", articles.len(), query.ticker);
        Ok(self.attach_content(articles).await)
    }
}
