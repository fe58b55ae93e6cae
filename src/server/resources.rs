//! Published resources
//!
//! A single markdown document describing the tool catalog, generated from the
//! registry so it cannot drift from what `tools/list` advertises.

use crate::errors::Error;
use crate::tools::ToolRegistry;
use crate::types::resources::{ListResourcesResult, ReadResourceResult, Resource, ResourceContents};

pub const DOCUMENTATION_URI: &str = "amadeus://documentation";
const MARKDOWN: &str = "text/markdown";

pub fn list_resources() -> ListResourcesResult {
    ListResourcesResult {
        resources: vec![Resource {
            uri: DOCUMENTATION_URI.to_string(),
            name: "amadeus_documentation".to_string(),
            description: Some("Amadeus travel tools: usage and parameters".to_string()),
            mime_type: Some(MARKDOWN.to_string()),
        }],
    }
}

pub fn read_resource(uri: &str, registry: &ToolRegistry) -> Result<ReadResourceResult, Error> {
    if uri != DOCUMENTATION_URI {
        return Err(Error::ResourceNotFound(uri.to_string()));
    }
    Ok(ReadResourceResult {
        contents: vec![ResourceContents {
            uri: DOCUMENTATION_URI.to_string(),
            mime_type: Some(MARKDOWN.to_string()),
            text: documentation(registry),
        }],
    })
}

fn documentation(registry: &ToolRegistry) -> String {
    let mut doc = String::from("# Amadeus Travel Tools\n\n## Available Tools\n");

    for tool in registry.list_tools() {
        doc.push_str(&format!("\n### {}\n{}\n\n", tool.name, tool.description));
        for param in &tool.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            match &param.description {
                Some(description) => {
                    doc.push_str(&format!("- `{}` ({}): {}\n", param.name, requirement, description))
                }
                None => doc.push_str(&format!("- `{}` ({})\n", param.name, requirement)),
            }
        }
    }

    doc.push_str(
        "\n## Usage Examples\n\n\
         - Search for flights from JFK to LAX on a specific date\n\
         - Find hotels in Paris for next weekend\n\
         - Look up airport codes for major cities\n\
         - Get travel recommendations for specific destinations\n\n\
         For more detailed information, visit: https://developers.amadeus.com/\n",
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockTravelService;
    use std::sync::Arc;

    #[test]
    fn test_documentation_lists_every_tool() {
        let registry = ToolRegistry::with_travel_tools(Arc::new(MockTravelService::new())).unwrap();
        let result = read_resource(DOCUMENTATION_URI, &registry).unwrap();
        let text = &result.contents[0].text;

        for tool in registry.list_tools() {
            assert!(text.contains(&format!("### {}", tool.name)));
        }
        assert!(text.contains("- `keyword` (required): "));
    }

    #[test]
    fn test_unknown_uri() {
        let registry = ToolRegistry::new(Arc::new(MockTravelService::new()));
        let err = read_resource("amadeus://nothing", &registry).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }
}
