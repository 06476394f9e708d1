//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::BodyEncoding;
use crate::cycle::NetworkFailurePolicy;
use crate::render::DateLocale;

pub const ENV_API_URL: &str = "STOCKGUARD_API_URL";
pub const ENV_LOCALE: &str = "STOCKGUARD_LOCALE";
pub const ENV_REFRESH_SECS: &str = "STOCKGUARD_REFRESH_SECS";
pub const ENV_NETWORK_ERRORS: &str = "STOCKGUARD_NETWORK_ERRORS";
pub const ENV_LOGIN_ENCODING: &str = "STOCKGUARD_LOGIN_ENCODING";
pub const ENV_SESSION_FILE: &str = "STOCKGUARD_SESSION_FILE";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub locale: DateLocale,
    pub refresh_interval: Duration,
    pub network_failures: NetworkFailurePolicy,
    pub login_encoding: BodyEncoding,
    /// Overrides the platform default session file.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            locale: DateLocale::default(),
            refresh_interval: Duration::from_secs(60),
            network_failures: NetworkFailurePolicy::default(),
            login_encoding: BodyEncoding::default(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: ENV_API_URL,
                    value: url,
                    reason: "expected an http(s) URL".to_string(),
                });
            }
            config.api_url = url;
        }
        if let Some(raw) = get(ENV_LOCALE) {
            config.locale = parse(ENV_LOCALE, raw)?;
        }
        if let Some(raw) = get(ENV_REFRESH_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_REFRESH_SECS,
                value: raw.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_REFRESH_SECS,
                    value: raw,
                    reason: "interval must be positive".to_string(),
                });
            }
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_NETWORK_ERRORS) {
            config.network_failures = parse(ENV_NETWORK_ERRORS, raw)?;
        }
        if let Some(raw) = get(ENV_LOGIN_ENCODING) {
            config.login_encoding = parse(ENV_LOGIN_ENCODING, raw)?;
        }
        if let Some(path) = get(ENV_SESSION_FILE) {
            config.session_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: core::str::FromStr<Err = String>,
{
    raw.parse().map_err(|reason| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason,
    })
}
