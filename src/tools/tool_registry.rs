//! Tool Registry
//!
//! Binds each tool descriptor to the service method that runs it. Arguments
//! are checked against the descriptor's compiled input schema, normalized
//! with the tool's defaults, then deserialized into the handler's typed
//! argument struct.

use crate::errors::Error;
use crate::service::args::{ToolOptions, parse_args};
use crate::service::{OrchestrationResult, TravelService};
use crate::types::tools::{CallToolParams, Tool};
use crate::utils::schema;
use async_trait::async_trait;
use futures::future::BoxFuture;
use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Renders a successful result as prose
pub type Renderer = fn(&OrchestrationResult) -> String;

/// How a tool's result is turned into text content
#[derive(Clone, Copy)]
pub enum ResponseStyle {
    /// Pretty JSON of the whole envelope
    Json,
    /// JSON by default, the renderer when the caller asks for `format: "text"`
    Summary(Renderer),
    /// Always the renderer
    Prose(Renderer),
}

impl std::fmt::Debug for ResponseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseStyle::Json => f.write_str("Json"),
            ResponseStyle::Summary(_) => f.write_str("Summary"),
            ResponseStyle::Prose(_) => f.write_str("Prose"),
        }
    }
}

/// Output format requested through the optional `format` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    fn from_arguments(arguments: &Map<String, Value>) -> Self {
        match arguments.get("format").and_then(Value::as_str) {
            Some("text") => OutputFormat::Text,
            _ => OutputFormat::Json,
        }
    }
}

/// Outcome of a dispatched tool call, ready for the formatter
#[derive(Debug)]
pub struct ToolResponse {
    pub tool: String,
    pub result: OrchestrationResult,
    pub style: ResponseStyle,
    pub format: OutputFormat,
}

/// Handler trait for registered tools
#[async_trait]
trait ToolHandler: Send + Sync {
    async fn handle(
        &self,
        service: Arc<dyn TravelService>,
        arguments: Map<String, Value>,
    ) -> Result<OrchestrationResult, Error>;
}

/// Type-safe wrapper binding a tool's argument struct to a service method
struct TypedHandler<F, A> {
    options: ToolOptions,
    handler: F,
    _marker: std::marker::PhantomData<fn() -> A>,
}

impl<F, A> TypedHandler<F, A> {
    fn new(options: ToolOptions, handler: F) -> Self {
        Self {
            options,
            handler,
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<F, A> ToolHandler for TypedHandler<F, A>
where
    F: Fn(Arc<dyn TravelService>, A) -> BoxFuture<'static, Result<OrchestrationResult, Error>>
        + Send
        + Sync,
    A: DeserializeOwned + Send + 'static,
{
    async fn handle(
        &self,
        service: Arc<dyn TravelService>,
        arguments: Map<String, Value>,
    ) -> Result<OrchestrationResult, Error> {
        let args: A = parse_args(&self.options, arguments)?;
        (self.handler)(service, args).await
    }
}

/// A tool descriptor with everything needed to run it
struct RegisteredTool {
    tool: Tool,
    handler_name: &'static str,
    schema: JSONSchema,
    style: ResponseStyle,
    handler: Box<dyn ToolHandler>,
}

/// Catalog of tools bound to the service that executes them
pub struct ToolRegistry {
    service: Arc<dyn TravelService>,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new(service: Arc<dyn TravelService>) -> Self {
        Self {
            service,
            tools: Vec::new(),
        }
    }

    /// Register a tool; its input schema is compiled once here
    pub fn register<A, F>(
        &mut self,
        tool: Tool,
        handler_name: &'static str,
        options: ToolOptions,
        style: ResponseStyle,
        handler: F,
    ) -> Result<&mut Self, Error>
    where
        A: DeserializeOwned + Send + 'static,
        F: Fn(Arc<dyn TravelService>, A) -> BoxFuture<'static, Result<OrchestrationResult, Error>>
            + Send
            + Sync
            + 'static,
    {
        if self.has_tool(&tool.name) {
            return Err(Error::Configuration(format!("Tool registered twice: {}", tool.name)));
        }
        let schema = schema::compile(&tool.input_schema())?;
        self.tools.push(RegisteredTool {
            tool,
            handler_name,
            schema,
            style,
            handler: Box::new(TypedHandler::new(options, handler)),
        });
        Ok(self)
    }

    /// Every descriptor, in registration order
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn get_tool(&self, name: &str) -> Option<&Tool> {
        self.find(name).map(|t| &t.tool)
    }

    /// Internal handler name bound to a tool
    pub fn handler_name(&self, name: &str) -> Option<&'static str> {
        self.find(name).map(|t| t.handler_name)
    }

    fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.tool.name == name)
    }

    /// Validate the arguments of a call and run the bound handler
    pub async fn call_tool(&self, params: CallToolParams) -> Result<ToolResponse, Error> {
        let CallToolParams { name, arguments } = params;
        let handler = self.handler_name(&name).unwrap_or("none");
        let started = Instant::now();

        let outcome = self.dispatch(&name, arguments).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::info!(tool = %name, handler, outcome = "ok", elapsed_ms, "Tool call"),
            Err(e) => {
                tracing::warn!(tool = %name, handler, outcome = "error", elapsed_ms, error = %e, "Tool call")
            }
        }
        outcome
    }

    async fn dispatch(&self, name: &str, arguments: Map<String, Value>) -> Result<ToolResponse, Error> {
        let registered = self
            .find(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        let instance = Value::Object(arguments);
        schema::validate_compiled(&registered.schema, &instance)?;
        let arguments = match instance {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let format = OutputFormat::from_arguments(&arguments);
        let result = registered
            .handler
            .handle(self.service.clone(), arguments)
            .await?;

        Ok(ToolResponse {
            tool: name.to_string(),
            result,
            style: registered.style,
            format,
        })
    }
}
