//! Client configuration
//!
//! Connection settings for Gate, plus loading of the `spin` CLI config file
//! (`~/.spin/config` by default) for credentials and a fallback endpoint.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;

/// Basic auth credentials sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Everything needed to build a [`crate::GateClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gate base URL (e.g., "https://gate.example.com")
    pub endpoint: String,
    /// Headers attached to every request
    pub default_headers: Vec<(String, String)>,
    pub basic_auth: Option<BasicAuth>,
    /// Accept invalid or self-signed TLS certificates
    pub ignore_cert_errors: bool,
    /// Do not follow redirects (Gate redirects to a login page when unauthenticated)
    pub ignore_redirects: bool,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            default_headers: Vec::new(),
            basic_auth: None,
            ignore_cert_errors: false,
            ignore_redirects: false,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_ignore_cert_errors(mut self, ignore: bool) -> Self {
        self.ignore_cert_errors = ignore;
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
}

/// Parse `key=value` header pairs separated by commas
///
/// An empty or whitespace-only string yields no headers.
pub fn parse_default_headers(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                ClientError::Config(format!(
                    "invalid default header {:?}: expected key=value",
                    pair
                ))
            })?;

            let name = name.trim();
            if name.is_empty() {
                return Err(ClientError::Config(format!(
                    "invalid default header {:?}: empty name",
                    pair
                )));
            }

            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

// =============================================================================
// spin config file
// =============================================================================

/// Subset of the `spin` CLI config file the provider understands
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpinConfig {
    #[serde(default)]
    pub gate: GateSection,
    #[serde(default)]
    pub auth: Option<AuthSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GateSection {
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub basic: Option<BasicSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BasicSection {
    pub username: String,
    pub password: String,
}

impl SpinConfig {
    /// Default location used by the `spin` CLI
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".spin").join("config"))
    }

    /// Load and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&contents).map_err(|e| {
            ClientError::Config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Basic auth credentials, if auth is enabled and configured
    pub fn basic_auth(&self) -> Option<BasicAuth> {
        let auth = self.auth.as_ref().filter(|auth| auth.enabled)?;
        auth.basic.as_ref().map(|basic| BasicAuth {
            username: basic.username.clone(),
            password: basic.password.clone(),
        })
    }
}
