use std::sync::Arc;

use radar_api_client::CompletionApi;
use radar_api_client::CompletionClient;
use radar_api_client::Prompt;
use tracing::debug;

use crate::config::Config;
use crate::error::RadarErr;
use crate::error::Result;
use crate::prompts::issue_prompt;

/// Asks the configured model about a subject and returns its raw completion.
#[derive(Clone)]
pub struct IssueFetcher {
    api: Arc<dyn CompletionApi>,
    model: String,
}

impl IssueFetcher {
    pub fn new(api: Arc<dyn CompletionApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    /// Build a fetcher talking to `config.model_provider`. Fails early when
    /// the provider's API key is not available.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.model_provider.api_key()?;
        let client = CompletionClient::new(config.model_provider.clone())?;
        Ok(Self::new(Arc::new(client), config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn fetch(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RadarErr::EmptyName);
        }

        let prompt = Prompt::new(self.model.clone(), issue_prompt(name));
        debug!(model = %self.model, "fetching issues for {name:?}");
        let completion = self.api.complete(&prompt).await?;
        Ok(completion)
    }
}
