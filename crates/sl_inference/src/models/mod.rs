use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::Client;
use sl_core::{Error, InferenceModel, Result};

use crate::Config;

pub mod deepseek;
pub mod dummy;
pub mod gemini;

pub use deepseek::DeepSeekModel;
pub use dummy::DummyModel;
pub use gemini::GeminiModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    DeepSeek,
    Dummy,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "gemini",
            ModelProvider::DeepSeek => "deepseek",
            ModelProvider::Dummy => "dummy",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ModelProvider::Gemini),
            "deepseek" => Ok(ModelProvider::DeepSeek),
            "dummy" => Ok(ModelProvider::Dummy),
            other => Err(Error::Config(format!(
                "Unknown model '{}'. Available models: gemini (default), deepseek, dummy",
                other
            ))),
        }
    }
}

/// Builds the configured model around the shared HTTP client
pub fn create_model(config: &Config, client: Client) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.provider {
        ModelProvider::Gemini => Arc::new(GeminiModel::new(client, config)?),
        ModelProvider::DeepSeek => Arc::new(DeepSeekModel::new(client, config)?),
        ModelProvider::Dummy => Arc::new(DummyModel::new()),
    };
    Ok(model)
}

/// Returns the API key or a configuration error naming the provider
pub(crate) fn require_api_key(config: &Config, provider: &str) -> Result<String> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} API key is required", provider)))
}
