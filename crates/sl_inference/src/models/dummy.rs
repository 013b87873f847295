use std::fmt;

use sl_core::{InferenceModel, Result};

const CANNED_REPLY: &str = "\
1. Strengths: Offline analysis, no model was contacted.
2. Future Risk Assessment: 50%
Estimated Returns (1 Month): 0%
Estimated Returns (1 Year): 0%
5. Opportunities: None identified.
6. Threats: None identified.";

/// Offline model that always answers with the same text.
pub struct DummyModel {
    reply: String,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::with_reply(CANNED_REPLY)
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Dummy model answering a {} char prompt", prompt.len());
        Ok(self.reply.clone())
    }
}
