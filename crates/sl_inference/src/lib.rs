use std::fmt;
use std::time::Duration;

pub mod analyst;
pub mod extract;
pub mod models;
pub mod prompts;

pub use analyst::Analyst;
pub use extract::{extract_projection, LabelExtractor, ProjectionExtractor};
pub use models::{create_model, ModelProvider};

/// Which model to talk to and how to reach it
#[derive(Clone)]
pub struct Config {
    pub provider: ModelProvider,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Gemini,
            api_key: None,
            model_name: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// Article content cap inside the per-article prompt
    pub max_content_chars: usize,
    /// Per-article excerpt length inside the summary prompt
    pub excerpt_chars: usize,
    /// Pause between consecutive model calls in a batch
    pub pause_between: Duration,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 5000,
            excerpt_chars: 500,
            pause_between: Duration::from_secs(1),
        }
    }
}

pub mod prelude {
    pub use super::{Analyst, AnalystConfig, Config};
    pub use super::models::create_model;
    pub use sl_core::{AnalyzedArticle, Article, Error, FinalAnalysis, InferenceModel, Result};
}
