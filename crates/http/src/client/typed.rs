//! Type-safe API clients that separate public from authenticated endpoints

use super::ClientError;
use super::hook::BearerSource;
use reqwest::{Client, ClientBuilder, header};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("reel-client/", env!("CARGO_PKG_VERSION"));

/// Client for public endpoints that don't require authentication
#[derive(Clone)]
pub struct PublicClient {
    client: Client,
    base_url: String,
}

/// Client for endpoints that require a bearer token
///
/// The token is not fixed: a [`BearerSource`] is consulted before every
/// request.
#[derive(Clone)]
pub struct AuthenticatedClient {
    public: PublicClient,
    bearer: Arc<dyn BearerSource>,
}

impl PublicClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        TypedClientBuilder::new().base_url(base_url).build_public()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a request whose success body carries nothing of interest
    pub async fn execute_ack(&self, request: reqwest::RequestBuilder) -> Result<(), ClientError> {
        send(request).await.map(drop)
    }

    /// Attach a bearer source to get an authenticated client
    pub fn authenticate(self, bearer: Arc<dyn BearerSource>) -> AuthenticatedClient {
        AuthenticatedClient {
            public: self,
            bearer,
        }
    }
}

impl AuthenticatedClient {
    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.public.base_url()
    }

    /// Create a request builder, running the pre-request hook first
    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.public.request(method, path);
        match self.bearer.bearer_token().await {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => {
                tracing::debug!(path, "No bearer token available, sending unauthenticated");
                request
            }
        }
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        self.public.execute(request).await
    }

    /// Get the public client (useful for calling public endpoints)
    pub fn to_public(&self) -> PublicClient {
        self.public.clone()
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "Request rejected by server");
        Err(ClientError::from_response(status, &body))
    }
}

/// Type-safe builder that creates the appropriate client type
#[derive(Default)]
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let base_url = validate_base_url(&base_url)?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(user_agent);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = self.timeout; // Timeouts not supported on WASM
            ClientBuilder::new().user_agent(user_agent).build()?
        };

        Ok(PublicClient { client, base_url })
    }

    /// Build an authenticated client
    pub fn build_authenticated(
        self,
        bearer: Arc<dyn BearerSource>,
    ) -> Result<AuthenticatedClient, ClientError> {
        Ok(self.build_public()?.authenticate(bearer))
    }
}

/// Check the URL and strip any trailing slash
fn validate_base_url(raw: &str) -> Result<String, ClientError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ClientError::Configuration(format!("invalid base_url '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Configuration(format!(
            "base_url must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
