//! Tool Types
//!
//! This module defines the tool descriptor advertised by `tools/list` and the
//! payloads of `tools/call`. Descriptors are assembled with [`ToolBuilder`] and
//! serialize to the `{name, description, inputSchema}` wire shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolParameterType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "array")]
    Array,
    /// Counts and sizes: accepted as `"10"` or `10`
    #[serde(rename = "count")]
    Count,
}

impl ToolParameterType {
    fn schema(self) -> Value {
        match self {
            ToolParameterType::String => json!({ "type": "string" }),
            ToolParameterType::Number => json!({ "type": ["string", "number"] }),
            ToolParameterType::Boolean => json!({ "type": "boolean" }),
            ToolParameterType::Object => json!({ "type": "object" }),
            ToolParameterType::Array => json!({ "type": "array" }),
            ToolParameterType::Count => json!({ "type": ["string", "integer"] }),
        }
    }
}

/// Represents a parameter for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Name of the parameter
    pub name: String,
    /// Type of the parameter
    #[serde(rename = "type")]
    pub type_name: ToolParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    /// Schema overriding the one derived from `type_name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ToolParameter {
    /// JSON Schema fragment for this parameter. Optional parameters also
    /// accept `null`, which is treated as absent.
    pub fn to_schema(&self) -> Value {
        let mut schema = self.schema.clone().unwrap_or_else(|| self.type_name.schema());

        if let Some(obj) = schema.as_object_mut() {
            if let Some(description) = &self.description {
                obj.insert("description".to_string(), Value::String(description.clone()));
            }
            if let Some(values) = self.enum_values.as_ref().filter(|v| !v.is_empty()) {
                obj.insert(
                    "enum".to_string(),
                    Value::Array(values.iter().cloned().map(Value::String).collect()),
                );
            }
            if let Some(default) = &self.default {
                obj.insert("default".to_string(), default.clone());
            }
            if !self.required {
                allow_null(obj);
            }
        }

        schema
    }
}

fn allow_null(schema: &mut Map<String, Value>) {
    match schema.get_mut("type") {
        Some(Value::Array(types)) => {
            if !types.iter().any(|t| t == "null") {
                types.push(json!("null"));
            }
        }
        Some(single) if single.is_string() => {
            let existing = single.take();
            *single = json!([existing, "null"]);
        }
        _ => {}
    }
    if let Some(Value::Array(values)) = schema.get_mut("enum") {
        values.push(Value::Null);
    }
}

/// Represents a tool in the MCP protocol
#[derive(Debug, Clone)]
pub struct Tool {
    /// Unique name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Parameters that the tool accepts, in declaration order
    pub parameters: Vec<ToolParameter>,
}

impl Tool {
    /// The `inputSchema` object used both on the wire and for argument validation
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            properties.insert(param.name.clone(), param.to_schema());
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

/// Wire form of [`Tool`]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolSchema {
    /// Unique name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Input schema for the tool
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<&Tool> for ToolSchema {
    fn from(tool: &Tool) -> Self {
        ToolSchema {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.input_schema(),
        }
    }
}

impl Serialize for Tool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ToolSchema::from(self).serialize(serializer)
    }
}

/// Result of listing tools
#[derive(Serialize, Debug, Clone)]
pub struct ListToolsResult {
    /// List of tools
    pub tools: Vec<Tool>,
}

/// Parameters for calling a tool
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct CallToolParams {
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl CallToolParams {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Text content for a tool result
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextContent {
    /// The type of content (always "text" for TextContent)
    #[serde(rename = "type")]
    pub content_type: String,

    /// The text content
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
            annotations: None,
        }
    }
}

/// Result of calling a tool
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CallToolResult {
    /// Content of the tool call result
    pub content: Vec<TextContent>,

    /// Flag indicating whether this is an error
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            is_error: true,
        }
    }

    /// Concatenated text of every content item
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builder for tool parameter
pub struct ToolParameterBuilder {
    name: String,
    type_name: ToolParameterType,
    description: Option<String>,
    required: bool,
    schema: Option<Value>,
    default: Option<Value>,
    enum_values: Option<Vec<String>>,
}

impl ToolParameterBuilder {
    /// Create a new parameter builder with the given name and type
    pub fn new(name: impl Into<String>, type_name: ToolParameterType) -> Self {
        Self {
            name: name.into(),
            type_name,
            description: None,
            required: false,
            schema: None,
            default: None,
            enum_values: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set a custom JSON schema for this parameter
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Advertise a default value; the value itself is applied by the tool's options table
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn enum_values(mut self, values: Vec<impl Into<String>>) -> Self {
        self.enum_values = Some(values.into_iter().map(|v| v.into()).collect());
        self
    }

    pub fn build(self) -> ToolParameter {
        ToolParameter {
            name: self.name,
            type_name: self.type_name,
            description: self.description,
            required: self.required,
            schema: self.schema,
            default: self.default,
            enum_values: self.enum_values,
        }
    }
}

/// Builder for creating tools
pub struct ToolBuilder {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
}

impl ToolBuilder {
    /// Create a new tool builder with the given name and description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Add the parameter built by the parameter builder
    pub fn with_parameter(mut self, parameter_builder: ToolParameterBuilder) -> Self {
        self.parameters.push(parameter_builder.build());
        self
    }

    /// Shorthand for a required string parameter
    pub fn required_string(self, name: &str, description: &str) -> Self {
        self.with_parameter(
            ToolParameterBuilder::new(name, ToolParameterType::String)
                .description(description)
                .required(true),
        )
    }

    /// Shorthand for an optional string parameter
    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.with_parameter(
            ToolParameterBuilder::new(name, ToolParameterType::String).description(description),
        )
    }

    pub fn build(self) -> Tool {
        Tool {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_builder_input_schema() {
        let tool = ToolBuilder::new("search_airports", "Search for airports by keyword")
            .required_string("keyword", "Search keyword")
            .optional_string("countryCode", "Country code to limit search")
            .with_parameter(
                ToolParameterBuilder::new("max", ToolParameterType::Count)
                    .description("Maximum number of results")
                    .default_value("10"),
            )
            .build();

        let wire = serde_json::to_value(&tool).unwrap();
        assert_eq!(wire["name"], "search_airports");
        assert_eq!(wire["inputSchema"]["required"], json!(["keyword"]));
        assert_eq!(
            wire["inputSchema"]["properties"]["max"]["type"],
            json!(["string", "integer", "null"])
        );
        assert_eq!(wire["inputSchema"]["properties"]["keyword"]["type"], "string");
        assert_eq!(wire["inputSchema"]["properties"]["max"]["default"], "10");
        assert_eq!(
            wire["inputSchema"]["properties"]["keyword"]["description"],
            "Search keyword"
        );

        let keys: Vec<&String> = wire["inputSchema"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, ["keyword", "countryCode", "max"]);
    }

    #[test]
    fn test_enum_values_land_in_schema() {
        let param = ToolParameterBuilder::new("format", ToolParameterType::String)
            .enum_values(vec!["json", "text"])
            .build();

        assert_eq!(param.to_schema()["enum"], json!(["json", "text", null]));
    }

    #[test]
    fn test_call_tool_result_serialization() {
        let ok = serde_json::to_value(CallToolResult::text("hello")).unwrap();
        assert_eq!(ok, json!({ "content": [{ "type": "text", "text": "hello" }] }));

        let err = serde_json::to_value(CallToolResult::error("Error: boom")).unwrap();
        assert_eq!(err["isError"], true);
    }
}
