//! Transports carrying JSON-RPC messages to the dispatcher
//!
//! Stdio is the default; the HTTP endpoint is opt-in through configuration.

pub mod http;
pub mod session_manager;
pub mod stdio;

pub use session_manager::SessionManager;
