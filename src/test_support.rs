//! Shared doubles for unit tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::Error;
use crate::provider::{AccessToken, Provider, ProviderPayload, ProviderRequest};

type Script = Box<dyn Fn(&ProviderRequest) -> Result<ProviderPayload, Error> + Send + Sync>;

/// Provider that answers every call from a closure and records what it was asked
pub struct ScriptedProvider {
    script: Script,
    calls: Mutex<Vec<ProviderRequest>>,
    token_requests: AtomicUsize,
    reject_credentials: bool,
}

impl ScriptedProvider {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&ProviderRequest) -> Result<ProviderPayload, Error> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            token_requests: AtomicUsize::new(0),
            reject_credentials: false,
        }
    }

    /// A provider whose token exchange always fails
    pub fn rejecting_credentials() -> Self {
        Self {
            reject_credentials: true,
            ..Self::new(|_| Ok(ProviderPayload::default()))
        }
    }

    pub fn calls(&self) -> Vec<ProviderRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn authenticate(&self) -> Result<AccessToken, Error> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        if self.reject_credentials {
            return Err(Error::Authentication(
                "Failed to get access token: 401 Unauthorized".to_string(),
            ));
        }
        Ok(AccessToken::new("test-token"))
    }

    async fn call(
        &self,
        request: &ProviderRequest,
        _token: &AccessToken,
    ) -> Result<ProviderPayload, Error> {
        self.calls.lock().unwrap().push(request.clone());
        (self.script)(request)
    }
}

/// Tool arguments from a JSON object literal
pub fn args_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn rate_limited() -> Error {
    Error::RateLimited("429 Too Many Requests".to_string())
}

pub fn upstream_error(status: u16) -> Error {
    Error::Upstream {
        status,
        status_text: "Scripted".to_string(),
        body: format!("{{\"errors\":[{{\"status\":{status}}}]}}"),
    }
}
