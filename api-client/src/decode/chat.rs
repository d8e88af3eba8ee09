use serde::Deserialize;

use crate::client::CompletionDecoder;
use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Reads `choices[0].message.content`.
pub struct ChatDecoder;

impl CompletionDecoder for ChatDecoder {
    fn decode(&self, body: &str) -> Result<String> {
        let response: ChatCompletionResponse = serde_json::from_str(body)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| Error::MissingCompletion("no message content in first choice".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_first_choice_content() {
        let body = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "[]"}}]}"#;

        assert_eq!(ChatDecoder.decode(body).expect("decodes"), "[]");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let err = ChatDecoder.decode(r#"{"choices": []}"#).expect_err("no choices");
        assert!(matches!(err, Error::MissingCompletion(_)));
    }
}
