//! Outbound completion calls against a configured text-generation provider.

pub mod api;
pub mod client;
mod common;
pub mod decode;
pub mod error;
pub mod payload;
pub mod prompt;

pub use crate::api::CompletionApi;
pub use crate::client::http::CompletionClient;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::prompt::Prompt;
pub use radar_provider_config::ProviderInfo;
pub use radar_provider_config::WireApi;
