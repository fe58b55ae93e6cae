//! Request Dispatcher
//!
//! Routes decoded JSON-RPC messages to the registry and resources. Transports
//! hand every message here and write back whatever response comes out;
//! notifications never produce one.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use jsonschema::JSONSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::errors::Error;
use crate::formatter;
use crate::messages::{GenericRequest, Message, Notification, Response};
use crate::tools::ToolRegistry;
use crate::types::initialize::{
    Implementation, InitializeRequestParams, InitializeResult, PROTOCOL_VERSION, ResourceCapabilities,
    ServerCapabilities, ToolCapabilities,
};
use crate::types::resources::ReadResourceParams;
use crate::types::tools::{CallToolParams, CallToolResult, ListToolsResult};
use crate::utils::schema;

use super::resources;

const INSTRUCTIONS: &str = "Travel search tools backed by the Amadeus self-service APIs. \
Search tools accept format=\"text\" for a readable summary.";

/// Supported protocol methods
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCES_READ: &str = "resources/read";
}

pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: Implementation,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one decoded message; `None` when no reply is due
    pub async fn handle_message(&self, message: Message) -> Option<Response> {
        match message {
            Message::Request(request) => Some(self.handle_request(request).await),
            Message::Notification(notification) => {
                self.handle_notification(notification);
                None
            }
            Message::Response(response) => {
                warn!("Ignoring unexpected response message (id {:?})", response.id);
                None
            }
        }
    }

    pub async fn handle_request(&self, request: GenericRequest) -> Response {
        let GenericRequest { id, method, params, .. } = request;
        debug!("Handling request {:?}: {}", id, method);

        match self.route(&method, params).await {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                debug!("Request {} failed: {}", method, e);
                Response::from_error(Some(id), &e)
            }
        }
    }

    fn handle_notification(&self, notification: Notification) {
        match notification.method.as_str() {
            methods::INITIALIZED => info!("Client initialized"),
            other => debug!("Received notification: {}", other),
        }
    }

    async fn route(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        match method {
            methods::INITIALIZE => {
                let params: InitializeRequestParams = optional_params(method, params)?;
                to_result(self.initialize(params))
            }
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => to_result(ListToolsResult {
                tools: self.registry.list_tools(),
            }),
            methods::TOOLS_CALL => {
                let params: CallToolParams = required_params(method, params)?;
                to_result(self.call_tool(params).await)
            }
            methods::RESOURCES_LIST => to_result(resources::list_resources()),
            methods::RESOURCES_READ => {
                let params: ReadResourceParams = required_params(method, params)?;
                to_result(resources::read_resource(&params.uri, &self.registry)?)
            }
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }

    fn initialize(&self, params: InitializeRequestParams) -> InitializeResult {
        if let Some(client) = &params.client_info {
            info!(
                "Initialize from {} {} (protocol {})",
                client.name,
                client.version.as_deref().unwrap_or("?"),
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                resources: Some(ResourceCapabilities {
                    subscribe: false,
                    list_changed: false,
                }),
                tools: Some(ToolCapabilities { list_changed: false }),
            },
            server_info: self.server_info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    /// Run a tool; every failure becomes error content rather than a protocol error
    pub async fn call_tool(&self, params: CallToolParams) -> CallToolResult {
        match self.registry.call_tool(params).await {
            Ok(response) => formatter::render(&response),
            Err(e) => formatter::error_result(&e),
        }
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(Error::Json)
}

/// Compiled parameter schemas, generated from the param types of each method
fn param_schemas() -> &'static HashMap<&'static str, JSONSchema> {
    static REGISTRY: OnceLock<HashMap<&'static str, JSONSchema>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        [
            (methods::INITIALIZE, schema::generate_schema::<InitializeRequestParams>()),
            (methods::TOOLS_CALL, schema::generate_schema::<CallToolParams>()),
            (methods::RESOURCES_READ, schema::generate_schema::<ReadResourceParams>()),
        ]
        .into_iter()
        .filter_map(|(method, generated)| match schema::compile(&generated) {
            Ok(compiled) => Some((method, compiled)),
            Err(e) => {
                warn!("Skipping parameter schema for {}: {}", method, e);
                None
            }
        })
        .collect()
    })
}

fn parse_params<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, Error> {
    if let Some(compiled) = param_schemas().get(method) {
        schema::validate_compiled(compiled, &value)?;
    }
    serde_json::from_value(value).map_err(|e| Error::InvalidParams(e.to_string()))
}

fn optional_params<T: DeserializeOwned + Default>(method: &str, params: Option<Value>) -> Result<T, Error> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => parse_params(method, value),
    }
}

fn required_params<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T, Error> {
    match params {
        None | Some(Value::Null) => Err(Error::InvalidParams(format!("Missing parameters for {}", method))),
        Some(value) => parse_params(method, value),
    }
}
