//! Server module for message handling
//!
//! The dispatcher that routes protocol methods, and the documentation
//! resource published next to the tools.

pub mod dispatcher;
pub mod resources;

pub use dispatcher::Dispatcher;
