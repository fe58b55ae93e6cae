//! Access tokens
//!
//! Tokens come from a client-credentials exchange and live only as long as the
//! handler invocation that requested them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::Credentials;
use crate::errors::Error;

use super::endpoints;

/// Bearer token issued by the provider
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub obtained_at: DateTime<Utc>,
    /// Lifetime reported by the provider, in seconds
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            obtained_at: Utc::now(),
            expires_in: None,
        }
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Perform the client-credentials exchange against `base_url`.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    base_url: &Url,
    credentials: &Credentials,
) -> Result<AccessToken, Error> {
    let url = endpoints::resolve(base_url, endpoints::TOKEN)?;

    let response = http
        .post(url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::Authentication(format!("Token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Authentication(format!(
            "Failed to get access token: {} {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Authentication(format!("Malformed token response: {}", e)))?;

    debug!(expires_in = ?token.expires_in, "Obtained provider access token");

    Ok(AccessToken {
        value: token.access_token,
        obtained_at: Utc::now(),
        expires_in: token.expires_in,
    })
}
