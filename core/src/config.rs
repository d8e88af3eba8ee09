//! On-disk configuration (`$RADAR_HOME/config.toml`) merged with command
//! line overrides into the explicit [`Config`] value every analysis runs on.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use radar_provider_config::GEMINI_PROVIDER_ID;
use radar_provider_config::ProviderInfo;
use radar_provider_config::built_in_model_providers;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::RadarErr;
use crate::error::Result;

pub const RADAR_HOME_ENV_VAR: &str = "RADAR_HOME";
pub const CONFIG_TOML_FILE: &str = "config.toml";

const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;
const DEFAULT_CACHE_CAPACITY: usize = 128;

/// How the timeline is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Scatter,
    Line,
}

/// Raw contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigToml {
    pub model_provider: Option<String>,
    pub model: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_capacity: Option<usize>,
    pub chart: Option<ChartKind>,
    /// User-defined providers; these extend the built-ins.
    #[serde(default)]
    pub model_providers: HashMap<String, ProviderInfo>,
}

/// Values supplied on the command line. They win over `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model_provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub chart: Option<ChartKind>,
    pub disable_cache: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model_provider_id: String,
    pub model_provider: ProviderInfo,
    pub model: String,
    /// Zero disables result caching.
    pub cache_ttl: Duration,
    /// Maximum number of cached reports, at least one.
    pub cache_capacity: usize,
    pub chart: ChartKind,
    pub radar_home: PathBuf,
}

impl Config {
    /// Load `config.toml` from the radar home and apply `overrides`.
    pub fn load_with_overrides(overrides: ConfigOverrides) -> Result<Self> {
        let radar_home = find_radar_home()?;
        let config_toml = load_config_as_toml(&radar_home)?;
        Self::load_from_base_config_with_overrides(config_toml, overrides, radar_home)
    }

    pub fn load_from_base_config_with_overrides(
        cfg: ConfigToml,
        overrides: ConfigOverrides,
        radar_home: PathBuf,
    ) -> Result<Self> {
        let ConfigOverrides {
            model_provider,
            model,
            base_url,
            chart,
            disable_cache,
        } = overrides;

        let mut model_providers = built_in_model_providers();
        for (id, provider) in cfg.model_providers {
            model_providers.entry(id).or_insert(provider);
        }

        let model_provider_id = model_provider
            .or(cfg.model_provider)
            .unwrap_or_else(|| GEMINI_PROVIDER_ID.to_string());
        let mut model_provider = model_providers
            .remove(&model_provider_id)
            .ok_or_else(|| RadarErr::UnknownProvider(model_provider_id.clone()))?;
        if let Some(base_url) = base_url {
            model_provider.base_url = Some(base_url);
        }

        let model = model
            .or(cfg.model)
            .or_else(|| model_provider.default_model.clone())
            .ok_or_else(|| RadarErr::MissingModel(model_provider_id.clone()))?;

        let cache_ttl = if disable_cache {
            Duration::ZERO
        } else {
            Duration::from_secs(cfg.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
        };
        let cache_capacity = cfg
            .cache_capacity
            .unwrap_or(DEFAULT_CACHE_CAPACITY)
            .max(1);

        Ok(Self {
            model_provider_id,
            model_provider,
            model,
            cache_ttl,
            cache_capacity,
            chart: chart.or(cfg.chart).unwrap_or_default(),
            radar_home,
        })
    }
}

/// `$RADAR_HOME` when set and non-empty, otherwise `~/.radar`. The directory
/// need not exist.
pub fn find_radar_home() -> Result<PathBuf> {
    match std::env::var(RADAR_HOME_ENV_VAR) {
        Ok(val) if !val.trim().is_empty() => Ok(PathBuf::from(val)),
        _ => dirs::home_dir()
            .map(|home| home.join(".radar"))
            .ok_or(RadarErr::NoHomeDir),
    }
}

/// Read `config.toml` under `radar_home`; a missing file is an empty config.
pub fn load_config_as_toml(radar_home: &Path) -> Result<ConfigToml> {
    let path = radar_home.join(CONFIG_TOML_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}, using defaults", path.display());
            return Ok(ConfigToml::default());
        }
        Err(err) => return Err(err.into()),
    };
    toml::from_str(&contents).map_err(|source| RadarErr::ConfigParse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use radar_provider_config::OSS_PROVIDER_ID;
    use radar_provider_config::WireApi;
    use tempfile::TempDir;

    fn load(cfg: ConfigToml, overrides: ConfigOverrides) -> Result<Config> {
        Config::load_from_base_config_with_overrides(cfg, overrides, PathBuf::from("/tmp/radar"))
    }

    #[test]
    fn defaults_to_gemini_with_hour_long_cache() {
        let config = load(ConfigToml::default(), ConfigOverrides::default()).expect("loads");

        assert_eq!(config.model_provider_id, "gemini");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.cache_ttl, Duration::from_secs(3_600));
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.chart, ChartKind::Bar);
    }

    #[test]
    fn overrides_win_over_file() {
        let cfg = ConfigToml {
            model_provider: Some("openai".to_string()),
            model: Some("gpt-file".to_string()),
            chart: Some(ChartKind::Line),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            model_provider: Some(OSS_PROVIDER_ID.to_string()),
            model: Some("llama-cli".to_string()),
            base_url: Some("http://127.0.0.1:9999/v1".to_string()),
            chart: Some(ChartKind::Scatter),
            disable_cache: true,
        };

        let config = load(cfg, overrides).expect("loads");

        assert_eq!(config.model_provider_id, "oss");
        assert_eq!(config.model, "llama-cli");
        assert_eq!(
            config.model_provider.base_url.as_deref(),
            Some("http://127.0.0.1:9999/v1")
        );
        assert_eq!(config.chart, ChartKind::Scatter);
        assert_eq!(config.cache_ttl, Duration::ZERO);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let overrides = ConfigOverrides {
            model_provider: Some("nope".to_string()),
            ..Default::default()
        };
        let err = load(ConfigToml::default(), overrides).expect_err("unknown provider");
        assert_eq!(err.to_string(), "model provider `nope` not found");
    }

    #[test]
    fn parses_user_providers_from_toml() {
        let home = TempDir::new().expect("tempdir");
        std::fs::write(
            home.path().join(CONFIG_TOML_FILE),
            r#"
model_provider = "proxy"
model = "gemini-1.5-pro"
cache_ttl_secs = 60
chart = "line"

[model_providers.proxy]
name = "Proxy"
base_url = "https://proxy.example.com/v1beta"
env_key = "PROXY_KEY"
api_key_header = "x-goog-api-key"

[model_providers.gemini]
name = "Shadowed"
"#,
        )
        .expect("write config");

        let cfg = load_config_as_toml(home.path()).expect("parses");
        let config = Config::load_from_base_config_with_overrides(
            cfg,
            ConfigOverrides::default(),
            home.path().to_path_buf(),
        )
        .expect("loads");

        assert_eq!(config.model_provider.name, "Proxy");
        assert_eq!(config.model_provider.wire_api, WireApi::GenerateContent);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.chart, ChartKind::Line);
    }

    #[test]
    fn user_providers_do_not_replace_built_ins() {
        let mut cfg = ConfigToml::default();
        cfg.model_providers.insert(
            GEMINI_PROVIDER_ID.to_string(),
            radar_provider_config::create_oss_provider(),
        );

        let config = load(cfg, ConfigOverrides::default()).expect("loads");
        assert_eq!(config.model_provider.name, "Gemini");
    }

    #[test]
    fn missing_config_file_is_empty_config() {
        let home = TempDir::new().expect("tempdir");
        assert_eq!(
            load_config_as_toml(home.path()).expect("missing is fine"),
            ConfigToml::default()
        );
    }

    #[test]
    fn malformed_config_reports_path() {
        let home = TempDir::new().expect("tempdir");
        std::fs::write(home.path().join(CONFIG_TOML_FILE), "model = [").expect("write");

        let err = load_config_as_toml(home.path()).expect_err("malformed");
        assert!(matches!(err, RadarErr::ConfigParse { .. }));
        assert!(err.to_string().contains(CONFIG_TOML_FILE));
    }
}
