use std::time::Duration;

use async_trait::async_trait;
use radar_provider_config::ProviderInfo;
use radar_provider_config::WireApi;
use reqwest::header::RETRY_AFTER;
use tracing::debug;

use crate::api::CompletionApi;
use crate::client::CompletionDecoder;
use crate::client::PayloadBuilder;
use crate::client::retry::retry_request;
use crate::decode::chat::ChatDecoder;
use crate::decode::generate_content::GenerateContentDecoder;
use crate::error::AttemptError;
use crate::error::Error;
use crate::error::Result;
use crate::payload::chat::ChatPayloadBuilder;
use crate::payload::generate_content::GenerateContentPayloadBuilder;
use crate::prompt::Prompt;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends one prompt per call to a single provider and returns the raw
/// completion text. Transient failures are retried per the provider's
/// retry budget.
pub struct CompletionClient {
    http_client: reqwest::Client,
    provider: ProviderInfo,
    payload_builder: Box<dyn PayloadBuilder>,
    decoder: Box<dyn CompletionDecoder>,
}

impl CompletionClient {
    pub fn new(provider: ProviderInfo) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let http_client = reqwest::Client::builder()
            .user_agent(format!("radar/{version}"))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| Error::Build(err.to_string()))?;
        Ok(Self::with_http_client(http_client, provider))
    }

    pub fn with_http_client(http_client: reqwest::Client, provider: ProviderInfo) -> Self {
        let (payload_builder, decoder): (Box<dyn PayloadBuilder>, Box<dyn CompletionDecoder>) =
            match provider.wire_api {
                WireApi::GenerateContent => (
                    Box::new(GenerateContentPayloadBuilder),
                    Box::new(GenerateContentDecoder),
                ),
                WireApi::Chat => (Box::new(ChatPayloadBuilder), Box::new(ChatDecoder)),
            };
        Self {
            http_client,
            provider,
            payload_builder,
            decoder,
        }
    }

    async fn attempt(
        &self,
        attempt: u64,
        prompt: &Prompt,
        payload: &serde_json::Value,
    ) -> std::result::Result<String, AttemptError> {
        let builder = self
            .provider
            .create_request_builder(&self.http_client, &prompt.model)
            .map_err(|err| AttemptError::Fatal(err.into()))?;

        debug!(
            attempt,
            provider = %self.provider.name,
            model = %prompt.model,
            "sending completion request"
        );
        let response = builder
            .json(payload)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response>".to_string());
            return Err(AttemptError::Status {
                status,
                body,
                retry_after,
            });
        }

        response.text().await.map_err(AttemptError::Transport)
    }
}

#[async_trait]
impl CompletionApi for CompletionClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let payload = self.payload_builder.build(prompt);
        let max_retries = self.provider.request_max_retries();

        let body = retry_request(max_retries, |attempt| self.attempt(attempt, prompt, &payload))
            .await?;
        debug!(bytes = body.len(), "received completion response");

        self.decoder.decode(&body)
    }
}
