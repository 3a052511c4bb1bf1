//! BitSafe HTTP client implementation.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{ApiRequest, ApiResponse, RootMessage, StatusCheck, StatusCheckCreate};

/// BitSafe API client.
///
/// Every request carries `Content-Type: application/json` and is bounded by
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct BitSafeClient {
    client: Client,
    base_url: String,
}

impl BitSafeClient {
    /// Create a new client with default options.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://localhost:8001"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a relative path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a raw request and return the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response could be obtained: connection
    /// failure, timeout, DNS resolution, or an unreadable body.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &url)
            .header(CONTENT_TYPE, "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        tracing::debug!(status, bytes = body.len(), "Received response");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Fetch the root greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn root(&self) -> Result<RootMessage, ClientError> {
        let response = self.send(&ApiRequest::get("api")).await?;
        Self::decode(&response)
    }

    /// List all stored status checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, ClientError> {
        let response = self.send(&ApiRequest::get("api/status")).await?;
        Self::decode(&response)
    }

    /// Create a status check for `client_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_status_check(
        &self,
        client_name: impl Into<String>,
    ) -> Result<StatusCheck, ClientError> {
        let body = serde_json::to_value(StatusCheckCreate {
            client_name: client_name.into(),
        })?;
        let response = self.send(&ApiRequest::post("api/status", body)).await?;
        Self::decode(&response)
    }

    fn decode<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> Result<T, ClientError> {
        if !response.is_success() {
            let message = if response.body.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                response.body.clone()
            };
            return Err(ClientError::Api {
                status: response.status,
                message,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 10).
    pub timeout_seconds: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: concat!("bitsafe-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }
}
