use serde::Deserialize;

use crate::client::CompletionDecoder;
use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Reads `candidates[0].content.parts[*].text`. Text split over several
/// parts is concatenated in order.
pub struct GenerateContentDecoder;

impl CompletionDecoder for GenerateContentDecoder {
    fn decode(&self, body: &str) -> Result<String> {
        let response: GenerateContentResponse = serde_json::from_str(body)?;

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map(|reason| format!("prompt blocked: {reason}"))
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(Error::MissingCompletion(reason));
        };

        let texts = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>();

        if texts.is_empty() {
            let finish_reason = candidate
                .finish_reason
                .unwrap_or_else(|| "unknown".to_string());
            return Err(Error::MissingCompletion(format!(
                "candidate has no text parts (finish reason: {finish_reason})"
            )));
        }

        Ok(texts.concat())
    }
}
