use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RadarErr>;

#[derive(Error, Debug)]
pub enum RadarErr {
    /// Analyses are only run for a non-blank name.
    #[error("a name is required")]
    EmptyName,

    #[error("model provider `{0}` not found")]
    UnknownProvider(String),

    #[error("no model configured for provider `{0}`; pass --model or set `model` in config.toml")]
    MissingModel(String),

    #[error("could not determine the home directory; set RADAR_HOME")]
    NoHomeDir,

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Api(#[from] radar_api_client::Error),

    #[error(transparent)]
    Provider(#[from] radar_provider_config::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
