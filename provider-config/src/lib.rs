//! Provider configuration shared across radar layers.
//!
//! This crate defines where completion requests are sent and how they are
//! authenticated. It intentionally knows nothing about prompts, issue records
//! or risk ratings.

use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing environment variable {var}")]
    MissingEnvVar {
        var: String,
        instructions: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

const DEFAULT_REQUEST_MAX_RETRIES: i64 = 2;
/// Hard cap for user-configured `request_max_retries`.
const MAX_REQUEST_MAX_RETRIES: i64 = 10;
const DEFAULT_REQUEST_TIMEOUT_MS: i64 = 60_000;
const DEFAULT_OLLAMA_PORT: i32 = 11434;

const DEFAULT_GENERATE_CONTENT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";

pub const GEMINI_PROVIDER_ID: &str = "gemini";
pub const OPENAI_PROVIDER_ID: &str = "openai";
pub const OSS_PROVIDER_ID: &str = "oss";

/// Wire protocol that the provider speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireApi {
    /// `POST {base}/models/{model}:generateContent` with a `contents` body.
    #[default]
    GenerateContent,
    /// Chat Completions compatible with `/v1/chat/completions`.
    Chat,
}

/// Serializable representation of a provider definition.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProviderInfo {
    /// Friendly display name.
    pub name: String,
    /// Base URL for the provider's API. Falls back to the public endpoint of
    /// the selected wire API.
    pub base_url: Option<String>,
    /// Model used when neither the config file nor the command line names one.
    pub default_model: Option<String>,
    /// Which wire protocol this provider expects.
    #[serde(default)]
    pub wire_api: WireApi,
    /// Environment variable that stores the user's API key for this provider.
    pub env_key: Option<String>,
    /// Optional instructions to help the user set the environment variable.
    pub env_key_instructions: Option<String>,
    /// Literal API key. Prefer `env_key` when possible.
    pub experimental_api_key: Option<String>,
    /// Header that carries the API key. When unset the key is sent as
    /// `Authorization: Bearer <key>`.
    pub api_key_header: Option<String>,
    /// Optional query parameters to append to the request URL.
    pub query_params: Option<HashMap<String, String>>,
    /// Additional static HTTP headers to include in requests.
    pub http_headers: Option<HashMap<String, String>>,
    /// Optional HTTP headers whose values come from environment variables.
    pub env_http_headers: Option<HashMap<String, String>>,
    /// Maximum number of times to retry a transient failure.
    pub request_max_retries: Option<i64>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: Option<i64>,
}

impl ProviderInfo {
    /// Construct the `POST` URL for `model` on the configured wire API.
    pub fn get_full_url(&self, model: &str) -> String {
        let query_string = self.get_query_string();
        let default_base_url = match self.wire_api {
            WireApi::GenerateContent => DEFAULT_GENERATE_CONTENT_BASE_URL,
            WireApi::Chat => DEFAULT_CHAT_BASE_URL,
        };
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(default_base_url)
            .trim_end_matches('/');

        match self.wire_api {
            WireApi::GenerateContent => {
                format!("{base_url}/models/{model}:generateContent{query_string}")
            }
            WireApi::Chat => format!("{base_url}/chat/completions{query_string}"),
        }
    }

    fn get_query_string(&self) -> String {
        self.query_params
            .as_ref()
            .filter(|params| !params.is_empty())
            .map_or_else(String::new, |params| {
                let mut pairs = params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>();
                pairs.sort();
                format!("?{}", pairs.join("&"))
            })
    }

    /// Apply static and env-derived headers to the provided builder.
    pub fn apply_http_headers(
        &self,
        mut builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        if let Some(extra) = &self.http_headers {
            for (k, v) in extra {
                builder = builder.header(k, v);
            }
        }
        if let Some(env_headers) = &self.env_http_headers {
            for (header, env_var) in env_headers {
                match std::env::var(env_var) {
                    Ok(val) if !val.trim().is_empty() => {
                        builder = builder.header(header, val);
                    }
                    _ => {}
                }
            }
        }
        builder
    }

    /// Resolve the API key, preferring a literal key over the environment.
    pub fn api_key(&self) -> Result<Option<String>> {
        if let Some(key) = &self.experimental_api_key {
            return Ok(Some(key.clone()));
        }
        Ok(match self.env_key.as_ref() {
            Some(env_key) => match std::env::var(env_key) {
                Ok(value) if !value.trim().is_empty() => Some(value),
                Ok(_blank) => None,
                Err(VarError::NotPresent) => {
                    let instructions = self.env_key_instructions.clone();
                    return Err(Error::MissingEnvVar {
                        var: env_key.to_string(),
                        instructions,
                    });
                }
                Err(VarError::NotUnicode(_)) => {
                    return Err(Error::MissingEnvVar {
                        var: env_key.to_string(),
                        instructions: None,
                    });
                }
            },
            None => None,
        })
    }

    pub fn request_max_retries(&self) -> u64 {
        let value = self
            .request_max_retries
            .unwrap_or(DEFAULT_REQUEST_MAX_RETRIES)
            .min(MAX_REQUEST_MAX_RETRIES);
        value.max(0) as u64
    }

    pub fn request_timeout(&self) -> Duration {
        let ms = self
            .request_timeout_ms
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        let clamped = if ms < 0 { 0 } else { ms as u64 };
        Duration::from_millis(clamped)
    }

    /// Create a `POST` request builder with provider and auth headers applied.
    pub fn create_request_builder(
        &self,
        client: &reqwest::Client,
        model: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let api_key = self.api_key()?;

        let mut builder = client
            .post(self.get_full_url(model))
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.request_timeout());
        builder = self.apply_http_headers(builder);

        if let Some(key) = api_key {
            builder = match self.api_key_header.as_deref() {
                Some(header) => builder.header(header, key),
                None => builder.bearer_auth(key),
            };
        }

        Ok(builder)
    }
}

/// Convenience helper to construct a local chat provider, e.g. Ollama.
pub fn create_oss_provider_with_base_url(url: &str) -> ProviderInfo {
    ProviderInfo {
        name: "oss".to_string(),
        base_url: Some(url.to_string()),
        default_model: Some("llama3.2".to_string()),
        wire_api: WireApi::Chat,
        env_key: None,
        env_key_instructions: None,
        experimental_api_key: None,
        api_key_header: None,
        query_params: None,
        http_headers: None,
        env_http_headers: None,
        request_max_retries: None,
        request_timeout_ms: None,
    }
}

pub fn create_oss_provider() -> ProviderInfo {
    create_oss_provider_with_base_url(&format!("http://localhost:{DEFAULT_OLLAMA_PORT}/v1"))
}

pub fn built_in_model_providers() -> HashMap<String, ProviderInfo> {
    let mut map = HashMap::new();

    map.insert(
        GEMINI_PROVIDER_ID.to_string(),
        ProviderInfo {
            name: "Gemini".to_string(),
            base_url: None,
            default_model: Some("gemini-2.0-flash".to_string()),
            wire_api: WireApi::GenerateContent,
            env_key: Some("GEMINI_API_KEY".to_string()),
            env_key_instructions: Some(
                "Create an API key at https://aistudio.google.com/app/apikey and export it as GEMINI_API_KEY.".to_string(),
            ),
            experimental_api_key: None,
            api_key_header: Some("x-goog-api-key".to_string()),
            query_params: None,
            http_headers: None,
            env_http_headers: None,
            request_max_retries: None,
            request_timeout_ms: None,
        },
    );

    map.insert(
        OPENAI_PROVIDER_ID.to_string(),
        ProviderInfo {
            name: "OpenAI".to_string(),
            base_url: None,
            default_model: Some("gpt-4o-mini".to_string()),
            wire_api: WireApi::Chat,
            env_key: Some("OPENAI_API_KEY".to_string()),
            env_key_instructions: Some(
                "Create a new API key at https://platform.openai.com/api-keys and export it as OPENAI_API_KEY.".to_string(),
            ),
            experimental_api_key: None,
            api_key_header: None,
            query_params: None,
            http_headers: None,
            env_http_headers: None,
            request_max_retries: None,
            request_timeout_ms: None,
        },
    );

    map.insert(OSS_PROVIDER_ID.to_string(), create_oss_provider());

    map
}
