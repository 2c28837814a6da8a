//! Provider configuration
//!
//! Mirrors the provider block the host declares: Gate URL, optional `spin`
//! config file, TLS leniency and default headers. Credentials come from the
//! config file.

use spinnaker_client::{ClientConfig, ClientError, RetryPolicy, SpinConfig, parse_default_headers};
use std::path::PathBuf;

use crate::error::{ProviderError, Result};

/// Environment variable holding the Gate URL
pub const GATE_URL_ENV: &str = "GATE_URL";
/// Environment variable holding the `spin` config file path
pub const CONFIG_PATH_ENV: &str = "SPINNAKER_CONFIG_PATH";

/// Provider-level settings, resolved once into a Gate client
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// URL for Gate; falls back to `gate.endpoint` from the config file when empty
    pub server: String,

    /// Path to the `spin` config file (defaults to `~/.spin/config` when present)
    pub config_path: Option<PathBuf>,

    /// Ignore certificate errors from Gate
    pub ignore_cert_errors: bool,

    /// Headers passed on each request, as `key=value` pairs separated by commas
    pub default_headers: String,

    /// Do not follow redirects from Gate
    pub ignore_redirects: bool,

    /// Retry policy for every Gate call
    pub retry: RetryPolicy,
}

impl ProviderConfig {
    /// Creates a new configuration with defaults
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            config_path: None,
            ignore_cert_errors: false,
            default_headers: String::new(),
            ignore_redirects: false,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_ignore_cert_errors(mut self, ignore: bool) -> Self {
        self.ignore_cert_errors = ignore;
        self
    }

    pub fn with_default_headers(mut self, headers: impl Into<String>) -> Self {
        self.default_headers = headers.into();
        self
    }

    pub fn with_ignore_redirects(mut self, ignore: bool) -> Self {
        self.ignore_redirects = ignore;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() && self.config_path.is_none() {
            return Err(ProviderError::Config(
                "server must be set when no config file is given".to_string(),
            ));
        }

        if !self.server.is_empty()
            && !self.server.starts_with("http://")
            && !self.server.starts_with("https://")
        {
            return Err(ProviderError::Config(
                "server must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the settings into client configuration, reading the config
    /// file if there is one
    pub fn client_config(&self) -> spinnaker_client::Result<ClientConfig> {
        let spin_config = match &self.config_path {
            Some(path) => Some(SpinConfig::load(path)?),
            None => SpinConfig::default_path()
                .filter(|path| path.is_file())
                .map(|path| SpinConfig::load(&path))
                .transpose()?,
        };

        let endpoint = if self.server.is_empty() {
            spin_config
                .as_ref()
                .and_then(|config| config.gate.endpoint.clone())
                .ok_or_else(|| ClientError::Config("no Gate endpoint configured".to_string()))?
        } else {
            self.server.clone()
        };

        let mut config = ClientConfig::new(endpoint)
            .with_ignore_cert_errors(self.ignore_cert_errors)
            .with_ignore_redirects(self.ignore_redirects)
            .with_retry(self.retry.clone());

        config.default_headers = parse_default_headers(&self.default_headers)?;
        config.basic_auth = spin_config.and_then(|spin| spin.basic_auth());

        Ok(config)
    }
}
