//! Client configuration.
//!
//! Values come from code or from `VIMEO_`-prefixed environment variables
//! (`VIMEO_BASE_URL`, `VIMEO_ACCESS_TOKEN`, `VIMEO_TIMEOUT_SECONDS`,
//! `VIMEO_USER_AGENT`). Anything unset falls back to its default.

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.vimeo.com";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("vimeo-core/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Ok(envy::prefixed("VIMEO_").from_env::<Self>()?)
    }

    /// Build from an explicit list of `VIMEO_*` pairs instead of the process
    /// environment.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed("VIMEO_").from_iter::<_, Self>(pairs)?)
    }
}
