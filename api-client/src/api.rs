use async_trait::async_trait;

use crate::error::Result;
use crate::prompt::Prompt;

/// Anything that can turn a prompt into the model's completion text.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}
