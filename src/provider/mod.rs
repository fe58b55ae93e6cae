//! Provider Client
//!
//! Everything that talks to the Amadeus self-service APIs: the request and
//! payload types, the client-credentials token exchange, the reqwest-backed
//! client and the rate-limit retry policy used by individual handlers.
//!
//! The [`Provider`] trait is the seam the orchestration layer depends on, so
//! handlers can run against scripted doubles in tests.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod token;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;

pub use client::HttpProviderClient;
pub use retry::RetryPolicy;
pub use token::AccessToken;

/// HTTP verb of a provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One provider call: path, query string and optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ProviderRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Value of a query parameter, if set
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed body of a successful provider response, returned whole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionaries: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl ProviderPayload {
    /// Payload whose `data` is the given value
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// `data` as a list of records; a single object counts as one record
    pub fn records(&self) -> Vec<Value> {
        match &self.data {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single.clone()],
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.data {
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(map)) => map.is_empty(),
            Some(Value::Null) | None => true,
            Some(_) => false,
        }
    }
}

/// Upstream travel-data provider
#[async_trait]
pub trait Provider: Send + Sync {
    /// Exchange configured credentials for a bearer token
    async fn authenticate(&self) -> Result<AccessToken, Error>;

    /// Perform one authenticated call. Non-2xx answers are errors; nothing is retried here.
    async fn call(&self, request: &ProviderRequest, token: &AccessToken)
    -> Result<ProviderPayload, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder_keeps_query_order() {
        let request = ProviderRequest::get(endpoints::FLIGHT_OFFERS)
            .query("originLocationCode", "NYC")
            .query_opt("returnDate", None::<String>)
            .query("adults", "1");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.param("adults"), Some("1"));
        assert_eq!(request.param("returnDate"), None);
        assert_eq!(request.query.len(), 2);
    }

    #[test]
    fn test_payload_records() {
        let list: ProviderPayload =
            serde_json::from_value(json!({ "data": [{ "id": 1 }, { "id": 2 }], "meta": { "count": 2 } }))
                .unwrap();
        assert_eq!(list.records().len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.meta, Some(json!({ "count": 2 })));

        let single = ProviderPayload::with_data(json!({ "id": "x" }));
        assert_eq!(single.records(), vec![json!({ "id": "x" })]);

        let empty: ProviderPayload = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(empty.is_empty());
        assert!(ProviderPayload::default().records().is_empty());
    }
}
