//! Amadeus travel tools over the Model Context Protocol
//!
//! This crate exposes the Amadeus self-service travel APIs (flights, hotels,
//! locations, car rentals and trip planning) as MCP tools. Tool calls arrive
//! over stdio or HTTP, are validated against each tool's schema, run through
//! an orchestration layer that applies defaults and fallback chains, and come
//! back as JSON or as a readable text summary.

pub mod config;
pub mod errors;
pub mod formatter;
pub mod messages;
pub mod provider;
pub mod server;
pub mod service;
pub mod tools;
pub mod transport;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use config::ServerConfig;
pub use errors::Error;
pub use provider::HttpProviderClient;
pub use server::Dispatcher;
pub use service::{OrchestrationResult, TravelOrchestrator, TravelService, build_service};
pub use tools::ToolRegistry;
