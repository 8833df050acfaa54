use serde::Deserialize;
use thiserror::Error;

use crate::commands::Credential;

pub const API_BASE_URL_ENV: &str = "MODERATION_API_BASE_URL";
pub const CREDENTIAL_ENV: &str = "MODERATION_CREDENTIAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(String),
    #[error("MODERATION_API_BASE_URL is not set")]
    MissingBaseUrl,
}

/// Raw environment view. `serde-env` lowercases `MODERATION_API_BASE_URL` into
/// `moderation_api_base_url`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    moderation_api_base_url: Option<String>,
    moderation_credential: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    /// Sent as the CSRF token with every request. Empty means none.
    pub credential: Credential,
}

impl ConsoleConfig {
    pub fn new(api_base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            credential,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: RawConfig =
            serde_env::from_iter(vars).map_err(|err| ConfigError::Env(err.to_string()))?;
        let api_base_url = raw
            .moderation_api_base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        Ok(Self {
            api_base_url,
            credential: raw
                .moderation_credential
                .map(Credential::new)
                .unwrap_or_default(),
        })
    }
}
