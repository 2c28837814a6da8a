//! Configuration module
//!
//! Collects the global flags into the provider configuration.

use anyhow::Result;
use spinnaker_provider::{Provider, ProviderConfig};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// URL of Gate
    pub server: String,
    /// Path to the spin config file
    pub config_path: Option<PathBuf>,
    pub ignore_cert_errors: bool,
    /// Comma separated `key=value` headers
    pub default_headers: String,
}

impl Config {
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let mut config = ProviderConfig::new(self.server.clone())
            .with_ignore_cert_errors(self.ignore_cert_errors)
            .with_default_headers(self.default_headers.clone());

        if let Some(path) = &self.config_path {
            config = config.with_config_path(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn provider(&self) -> Result<Provider> {
        Ok(Provider::new(self.provider_config()?))
    }
}
