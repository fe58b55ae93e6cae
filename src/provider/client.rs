//! HTTP Provider Client
//!
//! reqwest-backed implementation of [`Provider`]. A non-2xx answer becomes
//! [`Error::Upstream`] (or [`Error::RateLimited`] for 429) with the body kept
//! verbatim; a 2xx answer is parsed as JSON and returned whole.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{Credentials, ServerConfig};
use crate::errors::Error;

use super::token::{self, AccessToken};
use super::{HttpMethod, Provider, ProviderPayload, ProviderRequest, endpoints};

/// Live client for the Amadeus self-service APIs
#[derive(Clone)]
pub struct HttpProviderClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpProviderClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("Invalid provider URL '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("amadeus-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Build a client from configuration; credentials must be present.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        let credentials = config.credentials.clone().ok_or_else(|| {
            Error::Configuration("Amadeus client credentials are not configured".to_string())
        })?;
        Self::new(config.provider_base_url(), credentials)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, Error> {
        endpoints::resolve(&self.base_url, path)
    }
}

#[async_trait]
impl Provider for HttpProviderClient {
    async fn authenticate(&self) -> Result<AccessToken, Error> {
        token::request_token(&self.http, &self.base_url, &self.credentials).await
    }

    #[instrument(skip(self, token), fields(path = %request.path))]
    async fn call(
        &self,
        request: &ProviderRequest,
        token: &AccessToken,
    ) -> Result<ProviderPayload, Error> {
        let url = self.url_for(&request.path)?;

        let builder = match request.method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        };
        let mut builder = builder
            .header(http::header::AUTHORIZATION, token.bearer())
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Provider responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(Error::RateLimited(format!("{} {}", request.path, body)));
            }
            return Err(Error::upstream(status, body));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(ProviderPayload::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
