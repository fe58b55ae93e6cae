//! Protocol Type Definitions
//!
//! Payload types carried inside JSON-RPC messages, grouped by protocol area:
//! initialization, resources and tools.

pub mod initialize;
pub mod resources;
pub mod tools;

pub use initialize::{Implementation, InitializeRequestParams, InitializeResult, ServerCapabilities};
pub use resources::{ListResourcesResult, ReadResourceParams, ReadResourceResult, Resource};
pub use tools::{CallToolParams, CallToolResult, ListToolsResult, TextContent, Tool, ToolParameter};
