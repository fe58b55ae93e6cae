//! Tool Support
//!
//! The registry binding tool descriptors to service handlers, and the travel
//! catalog registered into it at startup.

pub mod catalog;
pub mod tool_registry;

pub use catalog::register_travel_tools;
pub use tool_registry::{OutputFormat, Renderer, ResponseStyle, ToolRegistry, ToolResponse};
