use std::{env, time::Duration};

use secrecy::SecretString;
use services::services::generation::DEFAULT_TIMEOUT;
use thiserror::Error;
use utils::assets::{AssetDirError, asset_dir};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;
const DATABASE_FILE: &str = "builder.sqlite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error(transparent)]
    AssetDir(#[from] AssetDirError),
}

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Unset means demo mode: generation always serves the fallback site.
    pub api_key: Option<SecretString>,
    pub generation_model: Option<String>,
    pub generation_timeout: Duration,
    pub cookie_secure: bool,
}

impl DeploymentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("BACKEND_PORT").or_else(|| get("PORT")) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: "BACKEND_PORT", value })?,
            None => DEFAULT_PORT,
        };

        let generation_timeout = match get("GENERATION_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    var: "GENERATION_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_TIMEOUT,
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                var: "COOKIE_SECURE",
                value,
            })?,
            None => false,
        };

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => format!("sqlite://{}", asset_dir()?.join(DATABASE_FILE).display()),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            api_key: get("ANTHROPIC_API_KEY").map(SecretString::from),
            generation_model: get("GENERATION_MODEL"),
            generation_timeout,
            cookie_secure,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
