//! Resource Types
//!
//! Read-only documents the server publishes next to its tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A resource advertised by `resources/list`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Resource {
    /// Resource URI
    pub uri: String,
    /// Human-readable name
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Result of listing resources
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,
}

/// Parameters for `resources/read`
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// Text body of a resource
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

/// Result of reading a resource
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}
