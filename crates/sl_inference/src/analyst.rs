use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sl_core::{AnalysisText, AnalyzedArticle, Article, FinalAnalysis, InferenceModel};
use tracing::{error, info};

use crate::extract::{LabelExtractor, ProjectionExtractor};
use crate::prompts::{analysis_prompt, final_prompt};
use crate::AnalystConfig;

pub const ONE_MONTH: &str = "1 Month";
pub const ONE_YEAR: &str = "1 Year";

/// Runs per-article analyses and the final summary against one model.
///
/// Model failures never surface as errors: they come back as unavailable
/// fields on the returned records.
#[derive(Clone)]
pub struct Analyst {
    model: Arc<dyn InferenceModel>,
    extractor: Arc<dyn ProjectionExtractor>,
    config: AnalystConfig,
}

impl fmt::Debug for Analyst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyst")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Analyst {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self {
            model,
            extractor: Arc::new(LabelExtractor),
            config: AnalystConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalystConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ProjectionExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn analyze_article(&self, article: Article) -> AnalyzedArticle {
        info!("Analyzing article: {}", article.title);
        let prompt = analysis_prompt(&article, self.config.max_content_chars);

        match self.model.generate(&prompt).await {
            Ok(reply) => {
                let text = reply.trim();
                AnalyzedArticle {
                    estimated_returns_1_month: self.extractor.extract(text, ONE_MONTH),
                    estimated_returns_1_year: self.extractor.extract(text, ONE_YEAR),
                    analysis: AnalysisText::from(text),
                    article,
                }
            }
            Err(e) => {
                error!("Error occurred during article analysis of '{}': {}", article.title, e);
                AnalyzedArticle::failed(article)
            }
        }
    }

    /// Analyzes articles in order, skipping titles already analyzed in this
    /// batch and pausing between model calls.
    pub async fn analyze_articles(&self, articles: &[Article]) -> Vec<AnalyzedArticle> {
        let mut analyzed = Vec::with_capacity(articles.len());
        let mut seen_titles = HashSet::new();

        for article in articles {
            if seen_titles.contains(&article.title) {
                continue;
            }
            if !analyzed.is_empty() && !self.config.pause_between.is_zero() {
                tokio::time::sleep(self.config.pause_between).await;
            }

            let result = self.analyze_article(article.clone()).await;
            if result.analysis.is_available() {
                seen_titles.insert(article.title.clone());
            }
            analyzed.push(result);
        }

        analyzed
    }

    pub async fn final_analysis(&self, articles: &[Article]) -> FinalAnalysis {
        let prompt = final_prompt(articles, self.config.excerpt_chars);

        match self.model.generate(&prompt).await {
            Ok(reply) => FinalAnalysis::from(reply.trim()),
            Err(e) => {
                error!("Error occurred while generating final analysis: {}", e);
                FinalAnalysis::Unavailable
            }
        }
    }
}
