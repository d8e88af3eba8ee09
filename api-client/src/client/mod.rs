use serde_json::Value;

use crate::error::Result;
use crate::prompt::Prompt;

pub mod http;
pub(crate) mod retry;

/// Encodes a prompt into the request body a wire API expects.
pub trait PayloadBuilder: Send + Sync {
    fn build(&self, prompt: &Prompt) -> Value;
}

/// Extracts the completion text from a successful response body.
pub trait CompletionDecoder: Send + Sync {
    fn decode(&self, body: &str) -> Result<String>;
}
