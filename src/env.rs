//! Environment variable names read into [`AppConfig`].
//!
//! Only [`AppConfig::from_env`] and [`AppConfig::load`] touch the process
//! environment; everything else receives the config by reference.

use crate::error::ConfigError;

/// Application name attached to every remote record.
pub const APP_NAME_ENV: &str = "APP_NAME";

/// Deployment environment tag, e.g. `production`.
pub const ENV_ENV: &str = "ENV";

/// Secret token of the remote log collector. Required.
pub const LOGGLY_TOKEN_ENV: &str = "LOGGLY_TOKEN";

/// Optional base URL of the remote log collector.
pub const LOGGLY_URL_ENV: &str = "LOGGLY_URL";

/// Set by the deployment once its configuration was loaded.
pub const CONFIG_IS_LOADED_ENV: &str = "CONFIG_IS_LOADED";

/// Collector used when [`LOGGLY_URL_ENV`] is unset.
pub const DEFAULT_LOGGLY_URL: &str = "https://logs-01.loggly.com";

/// Process-wide configuration, built once at startup and shared by
/// reference afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub app_name: Option<String>,
    pub env: Option<String>,
    pub token: String,
    /// Base URL of the collector, without trailing path.
    pub endpoint: String,
    pub config_loaded: bool,
}

impl AppConfig {
    /// Build a config from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get(LOGGLY_TOKEN_ENV).ok_or(ConfigError::Missing(LOGGLY_TOKEN_ENV))?;
        let endpoint = get(LOGGLY_URL_ENV).unwrap_or_else(|| DEFAULT_LOGGLY_URL.to_string());
        let config_loaded = get(CONFIG_IS_LOADED_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(AppConfig {
            app_name: get(APP_NAME_ENV),
            env: get(ENV_ENV),
            token,
            endpoint,
            config_loaded,
        })
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply a `.env` file from the working directory, when present, then
    /// read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Full ingestion URL: `<endpoint>/inputs/<token>/tag/http/`.
    pub fn collector_url(&self) -> String {
        format!(
            "{}/inputs/{}/tag/http/",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.token)
        )
    }
}
