//! Spinnaker Gate HTTP Client
//!
//! A small, typed client for the parts of Gate's API the provider
//! reconciles: pipeline configs and V2 pipeline templates.
//!
//! Every call goes through the same retry loop and the same response
//! handling, so errors carry the HTTP status whenever Gate answered.
//!
//! # Example
//!
//! ```no_run
//! use spinnaker_client::{ClientConfig, GateClient};
//!
//! # async fn example() -> spinnaker_client::Result<()> {
//! let client = GateClient::from_config(&ClientConfig::new("https://gate.example.com"))?;
//! let pipeline = client.get_pipeline("myapp", "deploy").await?;
//! println!("{}", serde_json::Value::Object(pipeline));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
mod pipelines;
pub mod retry;
mod templates;

// Re-export commonly used types
pub use config::{BasicAuth, ClientConfig, SpinConfig, parse_default_headers};
pub use error::{ClientError, Result};
pub use retry::RetryPolicy;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// HTTP client for the Gate API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GateClient {
    /// Base URL of Gate (e.g., "https://gate.example.com")
    base_url: Url,
    /// HTTP client instance
    client: Client,
    credentials: Option<BasicAuth>,
    retry: RetryPolicy,
}

impl GateClient {
    /// Create a client with default settings
    ///
    /// # Example
    /// ```
    /// use spinnaker_client::GateClient;
    ///
    /// let client = GateClient::new("http://localhost:8084").unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8084");
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client around a preconfigured reqwest Client
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client,
            credentials: None,
            retry: RetryPolicy::default(),
        })
    }

    /// Build a client from connection settings
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::Config(format!("invalid header name {:?}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::Config(format!("invalid value for header {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.ignore_cert_errors);

        if config.ignore_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: parse_base_url(&config.endpoint)?,
            client,
            credentials: config.basic_auth.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL of Gate, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    // =============================================================================
    // Request Plumbing
    // =============================================================================

    /// Build an endpoint URL from path segments, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, retrying transport errors and transient statuses
    ///
    /// `build` is called once per attempt since request bodies are consumed
    /// by sending.
    async fn send<F>(&self, operation: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = build();
            if let Some(credentials) = &self.credentials {
                request = request.basic_auth(&credentials.username, Some(&credentials.password));
            }

            debug!(operation, attempt, "Sending Gate request");

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(operation, status = %status, attempt, "Received Gate response");

                    if self.retry.should_retry_status(status.as_u16())
                        && self.retry.allows_retry(attempt)
                    {
                        let backoff = self.retry.backoff(attempt);
                        warn!(
                            operation,
                            status = %status,
                            attempt,
                            wait_ms = backoff.as_millis(),
                            "Transient Gate response, retrying with backoff"
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) if self.retry.allows_retry(attempt) => {
                    let backoff = self.retry.backoff(attempt);
                    warn!(
                        operation,
                        error = %e,
                        attempt,
                        wait_ms = backoff.as_millis(),
                        "Gate request failed, retrying with backoff"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status against the ones the operation accepts and
    /// deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        accepted: &[StatusCode],
    ) -> Result<T> {
        let response = self.check_status(response, accepted).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// Check the status of a response whose body is not needed
    async fn handle_empty_response(
        &self,
        response: Response,
        accepted: &[StatusCode],
    ) -> Result<()> {
        self.check_status(response, accepted).await?;
        Ok(())
    }

    async fn check_status(&self, response: Response, accepted: &[StatusCode]) -> Result<Response> {
        let status = response.status();

        if accepted.contains(&status) {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ClientError::api_error(
            status.as_u16(),
            error_message(status, &error_text),
        ))
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| ClientError::Config(format!("invalid Gate URL {:?}: {}", base_url, e)))
}

/// Gate wraps errors as `{"error": ..., "message": ..., "status": ...}`;
/// prefer the message, fall back to the raw body, then the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match message {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.to_string(),
    }
}
