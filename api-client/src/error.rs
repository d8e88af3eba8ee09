use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("missing env var {var}: {instructions:?}")]
    MissingEnvVar {
        var: String,
        instructions: Option<String>,
    },
    #[error("failed to build HTTP client: {0}")]
    Build(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("response carried no completion text: {0}")]
    MissingCompletion(String),
}

impl Error {
    /// HTTP status of the final failed attempt, when the provider answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

impl From<radar_provider_config::Error> for Error {
    fn from(err: radar_provider_config::Error) -> Self {
        match err {
            radar_provider_config::Error::MissingEnvVar { var, instructions } => {
                Error::MissingEnvVar { var, instructions }
            }
        }
    }
}

/// Failure of a single request attempt, before the retry policy decides
/// whether it is final.
#[derive(Error, Debug)]
pub(crate) enum AttemptError {
    #[error("status {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
        retry_after: Option<Duration>,
    },
    #[error("transport: {0}")]
    Transport(reqwest::Error),
    #[error(transparent)]
    Fatal(Error),
}
