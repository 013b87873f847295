use async_trait::async_trait;
use crate::Result;

/// A hosted (or local) text generation model.
#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Send a prompt and return the model's free-form reply
    async fn generate(&self, prompt: &str) -> Result<String>;
}
