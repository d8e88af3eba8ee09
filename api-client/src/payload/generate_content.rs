use serde_json::Value;
use serde_json::json;

use crate::client::PayloadBuilder;
use crate::prompt::Prompt;

/// The model is addressed by URL, so the body only carries the prompt.
pub struct GenerateContentPayloadBuilder;

impl PayloadBuilder for GenerateContentPayloadBuilder {
    fn build(&self, prompt: &Prompt) -> Value {
        json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt.text }
                    ]
                }
            ]
        })
    }
}
