//! JSON-RPC Message Types
//!
//! This module defines the envelope types exchanged over every transport:
//! requests, responses and notifications. Incoming lines are decoded into
//! [`Message`] and the dispatcher answers with a [`Response`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;

/// JSON-RPC request identifier, either numeric or textual
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

/// The top-level Message enum for handling JSON-RPC 2.0 messages
#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum Message {
    Request(GenericRequest),
    Response(Response),
    Notification(Notification),
}

/// Generic request type for initial deserialization of requests
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenericRequest {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Request ID
    pub id: RequestId,
    /// Method name (e.g., "tools/call")
    pub method: String,
    /// Generic parameters, parsed into specific types based on method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Response for a JSON-RPC request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Response {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// ID from the request; null when the request could not be parsed
    pub id: Option<RequestId>,
    /// Either a result or an error
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

/// Represents either a successful result or an error
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ResponseOutcome {
    /// Success case with a result
    Success { result: Value },
    /// Error case with error details
    Error { error: ErrorData },
}

/// Error information for failed requests
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorData {
    /// Error code (e.g., -32601 for Method not found)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional additional data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Notification is a request without an expected response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Notification {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Method name (e.g., "notifications/initialized")
    pub method: String,
    /// Optional parameters for the notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Response {
    /// Successful response carrying `result`
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id),
            outcome: ResponseOutcome::Success { result },
        }
    }

    /// Error response derived from a crate error
    pub fn from_error(id: Option<RequestId>, error: &Error) -> Self {
        error_response(id, error.to_code(), &error.to_string(), None)
    }
}

/// Create an error response with the given code, message, and optional data
pub fn error_response(
    id: Option<RequestId>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Response {
    Response {
        jsonrpc: "2.0".to_string(),
        id,
        outcome: ResponseOutcome::Error {
            error: ErrorData {
                code,
                message: message.to_string(),
                data,
            },
        },
    }
}

// Custom deserialization to correctly distinguish between requests and notifications
impl<'de> serde::de::Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;

        if value.get("jsonrpc").is_none() {
            return Err(D::Error::custom("Missing jsonrpc field"));
        }

        if value.get("result").is_some() || value.get("error").is_some() {
            let response: Response =
                serde_json::from_value(value).map_err(|e| D::Error::custom(e.to_string()))?;
            return Ok(Message::Response(response));
        }

        if value.get("id").is_some_and(|id| !id.is_null()) {
            let request: GenericRequest =
                serde_json::from_value(value).map_err(|e| D::Error::custom(e.to_string()))?;
            return Ok(Message::Request(request));
        }

        if value.get("method").is_some() {
            let notification: Notification =
                serde_json::from_value(value).map_err(|e| D::Error::custom(e.to_string()))?;
            return Ok(Message::Notification(notification));
        }

        Err(D::Error::custom("Invalid JSON-RPC message format"))
    }
}
