use serde_json::Value;
use serde_json::json;

use crate::client::PayloadBuilder;
use crate::prompt::Prompt;

pub struct ChatPayloadBuilder;

impl PayloadBuilder for ChatPayloadBuilder {
    fn build(&self, prompt: &Prompt) -> Value {
        json!({
            "model": prompt.model,
            "messages": [
                { "role": "user", "content": prompt.text }
            ],
            "stream": false,
        })
    }
}
