//! Error Types
//!
//! This module defines the error type shared by the provider client, the
//! orchestration handlers, the tool registry and the transports. Every failure
//! is scoped to the invocation that produced it; the dispatcher turns these
//! values into protocol error payloads instead of letting them escape.

use thiserror::Error;

/// The main Error type for the Amadeus MCP server
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failures that never produced a response (DNS, TLS, connect)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-related errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol errors (e.g., invalid message format)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token exchange with the provider failed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-2xx answer from the provider
    #[error("Upstream error {status} {status_text}: {body}")]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },

    /// HTTP 429 from the provider
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Retry budget for rate-limited calls used up
    #[error("Max retries exceeded for {0}")]
    MaxRetriesExceeded(String),

    /// A step produced no data
    #[error("No data returned for {0}")]
    EmptyResult(String),

    /// Tool name absent from the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Resource URI the server does not publish
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Protocol method the dispatcher does not route
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Failure wrapped at an orchestration handler boundary
    #[error("{operation} failed: {source}")]
    Operation {
        operation: String,
        source: Box<Error>,
    },
}

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    /// Parse error
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Resource not found
    pub const RESOURCE_NOT_FOUND: i32 = -33000;
    /// Tool not found
    pub const TOOL_NOT_FOUND: i32 = -33001;
    /// Tool execution error
    pub const TOOL_EXECUTION_ERROR: i32 = -33002;
    /// Authentication error
    pub const AUTHENTICATION_ERROR: i32 = -33008;
    /// Rate limit exceeded
    pub const RATE_LIMIT_EXCEEDED: i32 = -33010;
}

impl Error {
    /// Convert an error to a JSON-RPC error code
    pub fn to_code(&self) -> i32 {
        use error_codes::*;
        match self {
            Error::Json(_) => PARSE_ERROR,
            Error::Protocol(_) => INVALID_REQUEST,
            Error::UnknownMethod(_) => METHOD_NOT_FOUND,
            Error::InvalidParams(_) => INVALID_PARAMS,
            Error::UnknownTool(_) => TOOL_NOT_FOUND,
            Error::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            Error::Upstream { .. } | Error::EmptyResult(_) => TOOL_EXECUTION_ERROR,
            Error::Authentication(_) => AUTHENTICATION_ERROR,
            Error::RateLimited(_) | Error::MaxRetriesExceeded(_) => RATE_LIMIT_EXCEEDED,
            Error::Operation { source, .. } => source.to_code(),
            Error::Configuration(_) | Error::Io(_) | Error::Http(_) | Error::Transport(_) => {
                INTERNAL_ERROR
            }
        }
    }

    /// Wrap this error with the name of the operation it interrupted.
    pub fn within(self, operation: impl Into<String>) -> Self {
        Error::Operation {
            operation: operation.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error beneath any handler-boundary wrapping
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the provider rejected the call with HTTP 429
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.root_cause(), Error::RateLimited(_))
    }

    /// Build an upstream error from a failed provider response
    pub fn upstream(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Error::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wrapping_keeps_root_cause() {
        let err = Error::MaxRetriesExceeded("city search".into()).within("City search");

        assert_eq!(err.to_string(), "City search failed: Max retries exceeded for city search");
        assert!(matches!(err.root_cause(), Error::MaxRetriesExceeded(_)));
        assert_eq!(err.to_code(), error_codes::RATE_LIMIT_EXCEEDED);
    }

    #[test]
    fn test_upstream_from_status() {
        let err = Error::upstream(reqwest::StatusCode::BAD_GATEWAY, "oops");
        match err {
            Error::Upstream { status, status_text, body } => {
                assert_eq!(status, 502);
                assert_eq!(status_text, "Bad Gateway");
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limited_detection_through_wrapping() {
        assert!(Error::RateLimited("busy".into()).within("x").is_rate_limited());
        assert!(!Error::EmptyResult("x".into()).is_rate_limited());
    }
}
