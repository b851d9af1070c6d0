//! Client configuration

use crate::credentials::{CredentialSource, EnvCredentialStore, JsonFileCredentialStore};
use crate::errors::{BrokerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "BROKER_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "BROKER_TIMEOUT_MS";
pub const ENV_FALLBACK_ON_AUTH_REJECTED: &str = "BROKER_FALLBACK_ON_AUTH_REJECTED";
pub const ENV_CREDENTIALS_FILE: &str = "BROKER_CREDENTIALS_FILE";

/// Broker client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub enable_timing: bool,
    /// Serve demo data when the broker rejects configured credentials
    pub fallback_on_auth_rejected: bool,
    /// JSON credential file; the process environment is used when unset
    pub credentials_file: Option<PathBuf>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.kucoin.com".to_string(),
            timeout_ms: 10_000,
            enable_timing: true,
            fallback_on_auth_rejected: false,
            credentials_file: None,
        }
    }
}

impl BrokerConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_timing(mut self, enable: bool) -> Self {
        self.enable_timing = enable;
        self
    }

    pub fn with_fallback_on_auth_rejected(mut self, enable: bool) -> Self {
        self.fallback_on_auth_rejected = enable;
        self
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Defaults overridden by `BROKER_*` variables, after loading `.env`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::default().with_env_overrides()
    }

    /// Apply `BROKER_*` variables present in the environment
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(url) = env_var(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(timeout) = env_var(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_var(ENV_TIMEOUT_MS, &timeout)?;
        }
        if let Some(flag) = env_var(ENV_FALLBACK_ON_AUTH_REJECTED) {
            self.fallback_on_auth_rejected = parse_var(ENV_FALLBACK_ON_AUTH_REJECTED, &flag)?;
        }
        if let Some(path) = env_var(ENV_CREDENTIALS_FILE) {
            self.credentials_file = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Credential store this configuration points at
    pub fn credential_source(&self) -> CredentialSource {
        match &self.credentials_file {
            Some(path) => CredentialSource::File(JsonFileCredentialStore::new(path.clone())),
            None => CredentialSource::Env(EnvCredentialStore::new()),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        BrokerError::ConfigurationError(format!("{name} has an invalid value: {value}"))
    })
}
